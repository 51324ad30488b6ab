use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lexdoc_annotate::anchor::{marker_offset, MarkerStyle};
use lexdoc_annotate::{
    ComposeInput, FileStore, FragmentRole, HeldSelection, KvAnnotationRepository, LoadOutcome, OfflineLibrary, Viewer,
};
use lexdoc_core::catalog;
use lexdoc_core::config::{resolve_with_base, Config, Settings};
use lexdoc_core::types::{Annotation, AnnotationKind, Document, KindTag, SearchFilters};
use lexdoc_core::Error;
use lexdoc_text::CatalogIndex;

#[derive(Parser)]
#[command(name = "lexdoc")]
#[command(about = "Read Mozambican legal documents and keep annotations on them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog documents
    Docs {
        #[arg(long)]
        category: Option<String>,
        /// Only documents kept for offline reading
        #[arg(long)]
        offline: bool,
    },
    /// Show one document's metadata
    Show { id: String },
    /// List categories with document counts
    Categories,
    /// Search the catalog
    Search {
        query: Option<String>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List a document's annotations
    Annotations {
        document: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Annotate an excerpt of a document
    Annotate {
        document: String,
        /// highlight, comment, bookmark or reference
        #[arg(long)]
        kind: KindTag,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long = "ref-doc")]
        ref_doc: Option<String>,
    },
    /// Delete an annotation
    Delete { document: String, annotation_id: String },
    /// Save a document's annotations into the all-documents snapshot
    Snapshot { document: String },
    /// Keep a document for offline reading, or release it with --off
    Offline {
        document: String,
        #[arg(long)]
        off: bool,
    },
    /// Print a page of a document with its annotation markers
    Render {
        document: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

type CliViewer = Viewer<KvAnnotationRepository<FileStore>, HeldSelection>;

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    if settings.log.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// A relative `store.dir` is taken from the working directory.
fn store_dir(settings: &Settings) -> anyhow::Result<PathBuf> {
    Ok(resolve_with_base(&std::env::current_dir()?, &settings.store.dir))
}

fn open_viewer(settings: &Settings, document_id: &str) -> anyhow::Result<Option<(CliViewer, &'static Document)>> {
    let Some(doc) = catalog::get_by_id(document_id) else {
        eprintln!("Documento não encontrado: {document_id}");
        return Ok(None);
    };
    let store = FileStore::new(store_dir(settings)?);
    let repo = KvAnnotationRepository::with_prefix(store, settings.store.key_prefix.clone());
    let mut viewer = Viewer::new(repo, HeldSelection::new(), settings.viewer.total_pages);
    match viewer.open(&doc.id)? {
        LoadOutcome::Recovered => {
            eprintln!("⚠️  Stored annotations for {} could not be read; starting empty", doc.id);
        }
        LoadOutcome::Seeded(n) => tracing::info!(document = %doc.id, n, "sample annotations created"),
        LoadOutcome::Stored(_) => {}
    }
    Ok(Some((viewer, doc)))
}

fn describe(a: &Annotation) -> String {
    let extra = match &a.kind {
        AnnotationKind::Comment { comment: Some(c) } => format!(" — {c}"),
        AnnotationKind::Reference { ref_doc_id: Some(id), ref_doc_title } => {
            format!(" → {}", ref_doc_title.as_deref().unwrap_or(id))
        }
        _ => String::new(),
    };
    format!("[{}] p.{} {:<9} \"{}\"{}", a.id, a.page, a.kind.tag(), a.text, extra)
}

fn print_document(d: &Document) {
    let offline = if d.is_offline { "  [offline]" } else { "" };
    println!("{}  {}{}", d.id, d.title, offline);
    println!("    {} • {} • {}", d.doc_type, d.category, d.published_date);
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    init_logging(&settings);

    match cli.command {
        Commands::Docs { category, offline } => {
            let library = OfflineLibrary::new(FileStore::new(store_dir(&settings)?));
            let docs: Vec<Document> = library
                .documents()?
                .into_iter()
                .filter(|d| match &category {
                    Some(c) => &d.category == c,
                    None => true,
                })
                .filter(|d| !offline || d.is_offline)
                .collect();
            for d in &docs {
                print_document(d);
            }
        }
        Commands::Show { id } => {
            let Some(d) = catalog::get_by_id(&id) else {
                eprintln!("Documento não encontrado: {id}");
                return Ok(ExitCode::FAILURE);
            };
            print_document(d);
            println!("    {}", d.description);
            println!("    {}", d.source_url);
        }
        Commands::Categories => {
            let index = CatalogIndex::from_catalog()?;
            for (category, count) in index.category_counts("")? {
                println!("{category:<16} {count}");
            }
        }
        Commands::Search { query, doc_type, from, to, keywords, limit } => {
            let mut filters =
                SearchFilters { document_type: doc_type, start_date: from, end_date: to, ..SearchFilters::default() };
            for k in &keywords {
                filters.add_keyword(k);
            }
            let index = CatalogIndex::from_catalog()?;
            let query = query.unwrap_or_default();
            let hits = index.search(&query, &filters, limit.unwrap_or(settings.search.default_limit))?;
            if hits.is_empty() {
                println!("Nenhum documento encontrado.");
            }
            for (i, h) in hits.iter().enumerate() {
                println!("{:>2}. {:<18} {:.3}  {} ({})", i + 1, h.id, h.score, h.title, h.category);
            }
        }
        Commands::Annotations { document, page } => {
            let Some((viewer, doc)) = open_viewer(&settings, &document)? else {
                return Ok(ExitCode::FAILURE);
            };
            println!("{} — {} anotações", doc.title, viewer.manager().len());
            let list: Vec<&Annotation> = match page {
                Some(p) => viewer.manager().on_page(p).collect(),
                None => viewer.manager().annotations().iter().collect(),
            };
            for a in list {
                println!("  {}", describe(a));
            }
        }
        Commands::Annotate { document, kind, text, page, comment, ref_doc } => {
            let Some((mut viewer, _)) = open_viewer(&settings, &document)? else {
                return Ok(ExitCode::FAILURE);
            };
            if !viewer.go_to_page(page) {
                eprintln!("Página {page} fora do intervalo 1..={}", viewer.pagination().total());
                return Ok(ExitCode::FAILURE);
            }
            viewer.selection_mut().select(text);
            if let Err(e) = viewer.begin_annotation(kind) {
                eprintln!("{e}");
                return Ok(ExitCode::FAILURE);
            }
            if viewer.compose_state().awaits_extra_input() && comment.is_none() && ref_doc.is_none() {
                eprintln!("Nota: {kind} sem --comment nem --ref-doc; a anotação fica sem detalhe");
            }
            let input = ComposeInput { comment, ref_doc_id: ref_doc, position: None };
            match viewer.confirm(input)? {
                Some(a) => println!("✅ {}", describe(&a)),
                None => println!("Nada a anotar."),
            }
        }
        Commands::Delete { document, annotation_id } => {
            let Some((mut viewer, _)) = open_viewer(&settings, &document)? else {
                return Ok(ExitCode::FAILURE);
            };
            if viewer.delete_annotation(&annotation_id)? {
                println!("🗑️  {annotation_id} removida");
            } else {
                println!("Anotação {annotation_id} não existe");
            }
        }
        Commands::Snapshot { document } => {
            let Some((viewer, doc)) = open_viewer(&settings, &document)? else {
                return Ok(ExitCode::FAILURE);
            };
            match viewer.manager().snapshot() {
                Ok(n) => println!("Anotações salvas com sucesso! ({n} de {})", doc.title),
                Err(Error::NotFound(_)) => println!("Nenhuma anotação para salvar"),
                Err(e) => {
                    eprintln!("Erro ao salvar anotações: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Offline { document, off } => {
            let library = OfflineLibrary::new(FileStore::new(store_dir(&settings)?));
            match library.set_offline(&document, !off) {
                Ok(true) if off => println!("{document} já não está disponível offline"),
                Ok(true) => println!("📥 {document} disponível offline"),
                Ok(false) => println!("Nada a alterar para {document}"),
                Err(Error::NotFound(_)) => {
                    eprintln!("Documento não encontrado: {document}");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Render { document, page } => {
            let Some((mut viewer, doc)) = open_viewer(&settings, &document)? else {
                return Ok(ExitCode::FAILURE);
            };
            if !viewer.go_to_page(page) {
                eprintln!("Página {page} fora do intervalo 1..={}", viewer.pagination().total());
                return Ok(ExitCode::FAILURE);
            }
            let (current, total) = (viewer.pagination().current(), viewer.pagination().total());
            println!("{} • Página {} de {}\n", doc.title, current, total);
            let rendered = viewer.visible_markers();
            if rendered.is_empty() {
                println!("(sem texto disponível para esta página)");
            }
            for f in rendered {
                match f.fragment.role {
                    FragmentRole::Heading => println!("## {}", f.fragment.text),
                    FragmentRole::Paragraph => println!("{}", f.fragment.text),
                }
                for m in f.markers {
                    let style = MarkerStyle::for_kind(m.kind.tag());
                    println!("   ⟵ {} ({}, y={}) {}", style.icon, style.color, marker_offset(m), describe(m));
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
