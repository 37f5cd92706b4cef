//! Fixed reference catalogs.
//!
//! Catalog rows are constants: scenario pipelines associate them via join
//! rows but never create or delete them.

/// A supply item (equipment available in the simulation room).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presidio {
    pub id: u32,
    pub nome: &'static str,
}

/// A consumable material required by a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Materiale {
    pub id: u32,
    pub nome: &'static str,
}

/// Supply catalog.
pub const PRESIDI: &[Presidio] = &[
    Presidio { id: 1, nome: "Defibrillatore" },
    Presidio { id: 2, nome: "Monitor multiparametrico" },
    Presidio { id: 3, nome: "Ventilatore meccanico" },
    Presidio { id: 4, nome: "Pallone autoespansibile" },
    Presidio { id: 5, nome: "Aspiratore" },
    Presidio { id: 6, nome: "Ecografo" },
    Presidio { id: 7, nome: "Elettrocardiografo" },
    Presidio { id: 8, nome: "Pompa siringa" },
    Presidio { id: 9, nome: "Carrello emergenza" },
    Presidio { id: 10, nome: "Saturimetro" },
];

/// Material catalog.
pub const MATERIALI: &[Materiale] = &[
    Materiale { id: 1, nome: "Guanti" },
    Materiale { id: 2, nome: "Siringhe" },
    Materiale { id: 3, nome: "Deflussore" },
    Materiale { id: 4, nome: "Garze sterili" },
    Materiale { id: 5, nome: "Catetere vescicale" },
    Materiale { id: 6, nome: "Sondino nasogastrico" },
    Materiale { id: 7, nome: "Maschera con reservoir" },
    Materiale { id: 8, nome: "Cannula orofaringea" },
    Materiale { id: 9, nome: "Set intubazione" },
    Materiale { id: 10, nome: "Elettrodi" },
];

/// Physical-exam section names, in display order. Sections absent from an
/// imported manifest default to empty text.
pub const ESAME_FISICO_SEZIONI: &[&str] = &[
    "aspetto_generale",
    "vie_aeree",
    "respirazione",
    "circolazione",
    "addome",
    "neurologico",
    "cute",
    "estremita",
];

/// Look up a supply by exact name.
pub fn presidio_by_nome(nome: &str) -> Option<&'static Presidio> {
    PRESIDI.iter().find(|p| p.nome == nome)
}

/// Look up a material by id.
pub fn materiale_by_id(id: u32) -> Option<&'static Materiale> {
    MATERIALI.iter().find(|m| m.id == id)
}
