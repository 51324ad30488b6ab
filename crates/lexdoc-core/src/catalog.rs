//! Static catalog of Mozambican legal documents.
//!
//! The catalog is fixed at build time. Lookups never fail: an unknown id is
//! simply absent and callers render their own "not found" state.

use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::types::Document;

const CONSTITUTION_PDF: &str =
    "https://www.portaldogoverno.gov.mz/por/content/download/1961/15929/version/1/file/constituicao.pdf";

struct Entry {
    id: &'static str,
    title: &'static str,
    doc_type: &'static str,
    description: &'static str,
    source_url: &'static str,
    published: (i32, u32, u32),
    category: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "constitution-moz",
        title: "Constituição da República de Moçambique",
        doc_type: "Constitucional",
        description: "Constituição da República de Moçambique, aprovada pela Assembleia da República em 16 de Novembro de 2004",
        source_url: CONSTITUTION_PDF,
        published: (2004, 11, 16),
        category: "Constitucional",
    },
    Entry {
        id: "lei-trabalho",
        title: "Lei do Trabalho",
        doc_type: "Trabalhista",
        description: "Lei nº 23/2007, de 1 de Agosto - Lei do Trabalho",
        source_url: CONSTITUTION_PDF,
        published: (2007, 8, 1),
        category: "Trabalhista",
    },
    Entry {
        id: "codigo-penal",
        title: "Código Penal de Moçambique",
        doc_type: "Penal",
        description: "Lei nº 35/2014, de 31 de Dezembro - Código Penal",
        source_url: CONSTITUTION_PDF,
        published: (2014, 12, 31),
        category: "Penal",
    },
    Entry {
        id: "lei-terras",
        title: "Lei de Terras",
        doc_type: "Civil",
        description: "Lei nº 19/97, de 1 de Outubro - Lei de Terras",
        source_url: CONSTITUTION_PDF,
        published: (1997, 10, 1),
        category: "Civil",
    },
    Entry {
        id: "codigo-comercial",
        title: "Código Comercial",
        doc_type: "Comercial",
        description: "Decreto-Lei nº 2/2005, de 27 de Dezembro - Código Comercial",
        source_url: CONSTITUTION_PDF,
        published: (2005, 12, 27),
        category: "Comercial",
    },
    Entry {
        id: "lei-familia",
        title: "Lei da Família",
        doc_type: "Civil",
        description: "Lei nº 22/2019, de 11 de Dezembro - Lei da Família e revoga a Lei nº 10/2004, de 25 de Agosto",
        source_url: "https://wlsa.org.mz/wp-content/uploads/2014/11/Lei_da_Familia.pdf",
        published: (2019, 12, 11),
        category: "Civil",
    },
];

static DOCUMENTS: OnceLock<Vec<Document>> = OnceLock::new();

/// Every document, in catalog order.
pub fn all() -> &'static [Document] {
    DOCUMENTS.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|e| {
                let (y, m, d) = e.published;
                Document {
                    id: e.id.to_string(),
                    title: e.title.to_string(),
                    doc_type: e.doc_type.to_string(),
                    description: e.description.to_string(),
                    source_url: e.source_url.to_string(),
                    published_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                    category: e.category.to_string(),
                    is_offline: false,
                }
            })
            .collect()
    })
}

pub fn get_by_id(id: &str) -> Option<&'static Document> {
    all().iter().find(|d| d.id == id)
}

pub fn get_by_category(category: &str) -> Vec<&'static Document> {
    all().iter().filter(|d| d.category == category).collect()
}

/// Distinct categories in first-seen order.
pub fn categories() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for d in all() {
        if !out.contains(&d.category.as_str()) {
            out.push(d.category.as_str());
        }
    }
    out
}
