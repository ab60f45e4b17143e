//! Deterministic display-name assignment for conversations.
//!
//! A conversation gets its name exactly once, at creation time, by indexing
//! a fixed catalog with its id. Equal ids always yield equal names, and ids
//! congruent modulo the catalog length share a name.

use super::value_object::ConversationId;

/// Default catalog of display names.
pub const DEFAULT_NAME_CATALOG: &[&str] = &[
    "Karla Rodríguez",
    "Jorge Méndez",
    "Diego Fernández",
    "Sofía Castillo",
    "Valeria Jiménez",
    "Andrés Navarro",
    "Mariana Solano",
    "Luis Pineda",
    "Camila Herrera",
    "Fernando Rojas",
    "Laura Chacón",
    "Daniel Salas",
    "Gabriela Montoya",
    "Pablo Araya",
    "Natalia Cordero",
    "Ricardo Vargas",
    "Alejandra Pacheco",
    "Sebastián Quesada",
    "Mónica Zamora",
    "Javier Aguirre",
    "Paola Segura",
    "Martín Esquivel",
    "Lucía Morales",
    "Cristian Barboza",
    "Andrea Céspedes",
    "Felipe Marín",
    "Daniela Campos",
    "Marco Leiva",
];

/// Assign a display name to a conversation id.
///
/// Pure and total for any positive id: `catalog[(id - 1) mod len]`.
///
/// # Panics
///
/// Panics if `catalog` is empty; callers pass a fixed non-empty catalog.
pub fn assign_name<'a>(id: ConversationId, catalog: &'a [&'a str]) -> &'a str {
    assert!(!catalog.is_empty(), "name catalog must not be empty");
    let index = (id.value() - 1).rem_euclid(catalog.len() as i64) as usize;
    catalog[index]
}
