//! Text-anchor matching.
//!
//! An annotation shows a marker beside a rendered fragment when it belongs to
//! the current page and its excerpt occurs in the fragment verbatim. The test
//! is a case-sensitive substring scan over a handful of annotations; there is
//! no index and no normalization of whitespace or accents.

use lexdoc_core::types::{Annotation, KindTag};

/// Default vertical offset of a marker that carries no position.
pub const DEFAULT_MARKER_Y: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    Heading,
    Paragraph,
}

/// One fixed piece of rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub role: FragmentRole,
    pub text: &'static str,
}

const fn heading(text: &'static str) -> Fragment {
    Fragment { role: FragmentRole::Heading, text }
}

const fn paragraph(text: &'static str) -> Fragment {
    Fragment { role: FragmentRole::Paragraph, text }
}

#[derive(Debug)]
pub struct RenderedFragment<'a> {
    pub fragment: &'a Fragment,
    pub markers: Vec<&'a Annotation>,
}

/// Icon and background of a marker, by annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

impl MarkerStyle {
    pub fn for_kind(tag: KindTag) -> Self {
        match tag {
            KindTag::Comment => Self { icon: "message-square", color: "blue" },
            KindTag::Reference => Self { icon: "link", color: "green" },
            KindTag::Highlight | KindTag::Bookmark => Self { icon: "bookmark", color: "yellow" },
        }
    }
}

pub fn marker_offset(annotation: &Annotation) -> f64 {
    // an unset y (0) or a non-number falls back to the default row
    annotation.position.map(|p| p.y).filter(|y| *y != 0.0 && !y.is_nan()).unwrap_or(DEFAULT_MARKER_Y)
}

pub fn matches(fragment: &str, annotation: &Annotation, current_page: u32) -> bool {
    annotation.page == current_page && !annotation.text.is_empty() && fragment.contains(annotation.text.as_str())
}

/// Every annotation anchored in `fragment` on `current_page`, in list order.
pub fn markers_for<'a>(fragment: &str, annotations: &'a [Annotation], current_page: u32) -> Vec<&'a Annotation> {
    annotations.iter().filter(|a| matches(fragment, a, current_page)).collect()
}

pub fn render_page<'a>(
    fragments: &'a [Fragment],
    annotations: &'a [Annotation],
    current_page: u32,
) -> Vec<RenderedFragment<'a>> {
    fragments
        .iter()
        .map(|fragment| RenderedFragment { fragment, markers: markers_for(fragment.text, annotations, current_page) })
        .collect()
}

/// Static rendered text of a document, page by page.
#[derive(Debug, Clone, Copy)]
pub struct DocumentText {
    pages: &'static [&'static [Fragment]],
}

impl DocumentText {
    /// Built-in text for `document_id`, if the viewer ships one.
    pub fn for_document(document_id: &str) -> Option<Self> {
        match document_id {
            "constitution-moz" => Some(Self { pages: CONSTITUTION }),
            _ => None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Fragments of a 1-based page; empty beyond the shipped text.
    pub fn page(&self, page: u32) -> &'static [Fragment] {
        let idx = (page as usize).wrapping_sub(1);
        self.pages.get(idx).copied().unwrap_or(&[])
    }
}

const CONSTITUTION: &[&[Fragment]] = &[
    &[
        heading("CONSTITUIÇÃO DA REPÚBLICA DE MOÇAMBIQUE"),
        paragraph("Aprovada pela Assembleia da República, 16 de Novembro de 2004"),
        paragraph(
            "A Luta Armada de Libertação Nacional, respondendo aos anseios seculares do nosso Povo, aglutinou \
             todas as camadas patrióticas da sociedade moçambicana num mesmo ideal de liberdade, unidade, justiça \
             e progresso e fundou o Estado moçambicano, alicerce para a edificação de uma nação próspera.",
        ),
        paragraph(
            "A Constituição de 1990 introduziu o Estado de Direito Democrático, alicerçado na separação e \
             interdependência dos poderes e no pluralismo, lançando os parâmetros estruturais da modernização, \
             contribuindo de forma decisiva para a instauração de um clima democrático que levou o país à \
             realização das primeiras eleições multipartidárias.",
        ),
        paragraph(
            "A presente Constituição reafirma, desenvolve e aprofunda os princípios fundamentais do Estado \
             moçambicano, consagra o carácter soberano do Estado de Direito Democrático, baseado no pluralismo de \
             expressão, organização partidária e no respeito e garantia dos direitos e liberdades fundamentais dos \
             cidadãos.",
        ),
        heading("TÍTULO I - PRINCÍPIOS FUNDAMENTAIS"),
        heading("ARTIGO 1 - (República de Moçambique)"),
        paragraph("A República de Moçambique é um Estado independente, soberano, democrático e de justiça social."),
    ],
    &[
        heading("ARTIGO 2 - (Soberania e legalidade)"),
        paragraph("1. A soberania reside no povo."),
        paragraph("2. O povo moçambicano exerce a soberania segundo as formas fixadas na Constituição."),
        paragraph("3. O Estado subordina-se à Constituição e funda-se na legalidade."),
        paragraph("4. As normas constitucionais prevalecem sobre todas as restantes normas do ordenamento jurídico."),
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lexdoc_core::types::AnnotationKind;

    fn ann(id: &str, text: &str, page: u32) -> Annotation {
        Annotation {
            id: id.into(),
            text: text.into(),
            kind: AnnotationKind::Bookmark,
            page,
            created_at: Utc::now(),
            position: None,
        }
    }

    #[test]
    fn marker_follows_current_page() {
        let a = ann("1", "PRINCÍPIOS FUNDAMENTAIS", 1);
        assert!(matches("PRINCÍPIOS FUNDAMENTAIS", &a, 1));
        assert!(!matches("PRINCÍPIOS FUNDAMENTAIS", &a, 2));
    }

    #[test]
    fn substring_test_is_case_sensitive() {
        let a = ann("1", "princípios fundamentais", 1);
        assert!(!matches("TÍTULO I - PRINCÍPIOS FUNDAMENTAIS", &a, 1));
    }

    #[test]
    fn empty_excerpt_never_matches() {
        assert!(!matches("anything", &ann("1", "", 1), 1));
    }

    #[test]
    fn overlapping_annotations_all_get_markers() {
        let list = vec![ann("1", "Estado independente", 1), ann("2", "justiça social", 1), ann("3", "Estado", 2)];
        let hits = markers_for(
            "A República de Moçambique é um Estado independente, soberano, democrático e de justiça social.",
            &list,
            1,
        );
        let ids: Vec<&str> = hits.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn shipped_text_has_two_pages() {
        let text = DocumentText::for_document("constitution-moz").unwrap();
        assert_eq!(text.page_count(), 2);
        assert!(text.page(0).is_empty());
        assert!(text.page(3).is_empty());
        assert!(DocumentText::for_document("lei-terras").is_none());
    }

    #[test]
    fn marker_offset_defaults() {
        let mut a = ann("1", "x", 1);
        assert_eq!(marker_offset(&a), DEFAULT_MARKER_Y);
        a.position = Some(lexdoc_core::types::Position::new(4.0, 120.5));
        assert_eq!(marker_offset(&a), 120.5);
        a.position = Some(lexdoc_core::types::Position::new(4.0, 0.0));
        assert_eq!(marker_offset(&a), DEFAULT_MARKER_Y);
        a.position = Some(lexdoc_core::types::Position::new(4.0, f64::NAN));
        assert_eq!(marker_offset(&a), DEFAULT_MARKER_Y);
        a.position = Some(lexdoc_core::types::Position::new(4.0, -8.0));
        assert_eq!(marker_offset(&a), -8.0);
        assert_eq!(MarkerStyle::for_kind(KindTag::Reference).color, "green");
    }
}
