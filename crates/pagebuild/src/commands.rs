//! Implementations of the pagebuild subcommands.

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use builder::{
    Error as BuilderError, ExportOptions, FsStore, Notice, NoticeDispatcher, NoticeKind,
    SectionId, SectionStore, Session, export,
};
use preview::{
    SectionConfig, gallery,
    templates::{default_config, generate},
};
use tokio::{fs, sync::mpsc::Receiver};
use tracing::{info, warn};

use crate::{
    cli::{
        Commands, ExportArgs, GalleryArgs, GenerateArgs, PreviewArgs, SaveArgs, ShowArgs,
        TemplateArgs,
    },
    error::{Error, Result},
};

/// Notices buffered before the command reports them.
const NOTICE_CAPACITY: usize = 32;

/// Id used for previews of loose source files.
const SCRATCH_SECTION: &str = "Scratch";

/// Run one command against the store at `store`, writing results to `out`.
pub async fn dispatch(command: Commands, store: &Path, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Generate(args) => generate_cmd(&args, out).await,
        Commands::Preview(args) => preview_cmd(&args, store, out).await,
        Commands::Save(args) => save_cmd(&args, store, out).await,
        Commands::Show(args) => show_cmd(&args, store, out).await,
        Commands::Export(args) => export_cmd(&args, store, out).await,
        Commands::Gallery(args) => gallery_cmd(&args, out),
        Commands::Template(args) => template_cmd(&args, store, out).await,
    }
}

/// A session over the filesystem store plus the receiving end of its notices.
fn open_session(store: &Path, section: SectionId) -> (Session, Receiver<Notice>) {
    let (notices, rx) = NoticeDispatcher::channel(NOTICE_CAPACITY);
    let store: Arc<dyn SectionStore> = Arc::new(FsStore::new(store));
    (Session::new(store, notices, section), rx)
}

/// Print queued notices to stderr.
fn report(rx: &mut Receiver<Notice>) {
    while let Ok(notice) = rx.try_recv() {
        let label = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Warn => "warning",
            NoticeKind::Error => "error",
        };
        eprintln!("{}: {}: {}", label, notice.title, notice.text);
    }
}

async fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::file(path, e))
}

async fn read_config(path: &Path) -> Result<SectionConfig> {
    Ok(SectionConfig::from_json(&read_text(path).await?)?)
}

fn section_id(id: &str) -> Result<SectionId> {
    Ok(SectionId::new(id)?)
}

async fn generate_cmd(args: &GenerateArgs, out: &mut impl Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => read_config(path).await?,
        None => default_config(args.kind),
    };
    writeln!(out, "{}", generate(args.kind, &config))?;
    Ok(())
}

async fn preview_cmd(args: &PreviewArgs, store: &Path, out: &mut impl Write) -> Result<()> {
    let (mut session, mut rx) = match &args.section {
        Some(id) => {
            let id = section_id(id)?;
            let (mut session, rx) = open_session(store, id.clone());
            session.select(id);
            session.settle().await;
            (session, rx)
        }
        None => open_session(store, section_id(SCRATCH_SECTION)?),
    };
    if let Some(path) = &args.code {
        session.set_code(read_text(path).await?);
    }
    if let Some(path) = &args.config {
        session.set_config(read_config(path).await?);
    }

    let result = session.preview();
    if let Some(failure) = result.failure() {
        warn!(stage = ?failure.stage, message = %failure.message, "preview failed");
    }
    writeln!(out, "{}", result.to_html())?;
    report(&mut rx);
    Ok(())
}

async fn save_cmd(args: &SaveArgs, store: &Path, out: &mut impl Write) -> Result<()> {
    let id = section_id(&args.section)?;
    let kind = id.kind();
    let (mut session, mut rx) = open_session(store, id.clone());

    let config = match (&args.config, kind) {
        (Some(path), _) => read_config(path).await?,
        (None, Some(kind)) => default_config(kind),
        (None, None) => SectionConfig::new(),
    };
    session.set_config(config);
    match &args.code {
        Some(path) => session.set_code(read_text(path).await?),
        None if kind.is_some() => {
            session.generate_code();
        }
        None => {
            return Err(Error::InvalidArgument(format!(
                "section '{}' has no generator; pass --code",
                id
            )));
        }
    }
    if let Some(path) = &args.css {
        session.set_css(Some(read_text(path).await?));
    }

    let saved = session.save().await.map_err(BuilderError::from)?;
    report(&mut rx);
    saved?;
    writeln!(out, "{}", FsStore::new(store).path_for(&id).display())?;
    Ok(())
}

async fn show_cmd(args: &ShowArgs, store: &Path, out: &mut impl Write) -> Result<()> {
    let section = FsStore::new(store).load(&section_id(&args.section)?).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&section)?)?;
    Ok(())
}

async fn export_cmd(args: &ExportArgs, store: &Path, out: &mut impl Write) -> Result<()> {
    let fs_store = FsStore::new(store);
    let mut sections = Vec::with_capacity(args.sections.len());
    for id in &args.sections {
        let id = section_id(id)?;
        let stored = fs_store.load(&id).await?;
        sections.push((id, stored));
    }

    let options = ExportOptions {
        format: args.format,
        include_styles: !args.no_styles,
        include_config: !args.no_config,
        package_name: args.package_name.clone(),
        description: args.description.clone(),
    };
    let bundle = export(&options, &sections);

    let path: PathBuf = args.out.join(format!("{}.json", options.package_name));
    fs::create_dir_all(&args.out)
        .await
        .map_err(|e| Error::file(&args.out, e))?;
    fs::write(&path, bundle.to_json()?)
        .await
        .map_err(|e| Error::file(&path, e))?;
    info!(path = %path.display(), sections = bundle.sections.len(), "bundle written");
    writeln!(out, "{}", path.display())?;
    Ok(())
}

fn gallery_cmd(args: &GalleryArgs, out: &mut impl Write) -> Result<()> {
    for t in gallery::gallery(args.category) {
        writeln!(
            out,
            "{:<20} {:<11} {:>5}  {}: {}",
            t.id,
            t.category.to_string(),
            t.downloads,
            t.name,
            t.description
        )?;
    }
    Ok(())
}

async fn template_cmd(args: &TemplateArgs, store: &Path, out: &mut impl Write) -> Result<()> {
    let template = gallery::find(&args.id)
        .ok_or_else(|| Error::InvalidArgument(format!("no template with id '{}'", args.id)))?;
    let (mut session, mut rx) = open_session(store, SectionId::from(template.kind));
    session.apply_template(template);
    writeln!(out, "{}", session.editor().code)?;
    if args.save {
        let saved = session.save().await.map_err(BuilderError::from)?;
        report(&mut rx);
        saved?;
    } else {
        report(&mut rx);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs as stdfs;

    use builder::ExportFormat;
    use preview::SectionKind;
    use tempfile::tempdir;

    use super::*;

    async fn run(command: Commands, store: &Path) -> Result<String> {
        let mut out = Vec::new();
        dispatch(command, store, &mut out).await?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[tokio::test]
    async fn generate_prints_sample_code() {
        let dir = tempdir().expect("tempdir");
        let text = run(
            Commands::Generate(GenerateArgs {
                kind: SectionKind::Hero,
                config: None,
            }),
            dir.path(),
        )
        .await
        .expect("generate");
        assert!(text.starts_with("// HeroSection\n"));
    }

    #[tokio::test]
    async fn save_show_and_preview() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("hero.json");
        stdfs::write(&config, r#"{"heading": "From The CLI"}"#).expect("write");

        run(
            Commands::Save(SaveArgs {
                section: "HeroSection".to_string(),
                config: Some(config),
                code: None,
                css: None,
            }),
            dir.path(),
        )
        .await
        .expect("save");

        let shown = run(
            Commands::Show(ShowArgs {
                section: "HeroSection".to_string(),
            }),
            dir.path(),
        )
        .await
        .expect("show");
        assert!(shown.contains("From The CLI"));

        let html = run(
            Commands::Preview(PreviewArgs {
                section: Some("HeroSection".to_string()),
                code: None,
                config: None,
            }),
            dir.path(),
        )
        .await
        .expect("preview");
        assert!(html.contains("<h1"));
        assert!(html.contains("From The CLI"));
    }

    #[tokio::test]
    async fn broken_code_previews_as_an_error_panel() {
        let dir = tempdir().expect("tempdir");
        let code = dir.path().join("broken.rhai");
        stdfs::write(&code, "|props| h.el(\"div\", #{}, undefinedThing)").expect("write");
        let html = run(
            Commands::Preview(PreviewArgs {
                section: None,
                code: Some(code),
                config: None,
            }),
            dir.path(),
        )
        .await
        .expect("preview never fails on user code");
        assert!(html.contains("Component Error"));
    }

    #[tokio::test]
    async fn custom_sections_need_code() {
        let dir = tempdir().expect("tempdir");
        let err = run(
            Commands::Save(SaveArgs {
                section: "Promo".to_string(),
                config: None,
                code: None,
                css: None,
            }),
            dir.path(),
        )
        .await;
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn template_save_then_export() {
        let dir = tempdir().expect("tempdir");
        run(
            Commands::Template(TemplateArgs {
                id: "footer-modern".to_string(),
                save: true,
            }),
            dir.path(),
        )
        .await
        .expect("template");

        let out_dir = dir.path().join("dist");
        let written = run(
            Commands::Export(ExportArgs {
                sections: vec!["FooterSection".to_string()],
                format: ExportFormat::Template,
                package_name: "site".to_string(),
                description: "Test bundle".to_string(),
                no_styles: false,
                no_config: false,
                out: out_dir.clone(),
            }),
            dir.path(),
        )
        .await
        .expect("export");
        assert_eq!(written.trim(), out_dir.join("site.json").display().to_string());

        let bundle: serde_json::Value =
            serde_json::from_str(&stdfs::read_to_string(out_dir.join("site.json")).expect("read"))
                .expect("json");
        assert_eq!(bundle["name"], "site");
        assert_eq!(bundle["format"], "template");
        assert_eq!(bundle["sections"][0]["id"], "FooterSection");
        assert!(bundle["sections"][0]["config"].is_object());
    }

    #[tokio::test]
    async fn source_export_includes_config_unless_disabled() {
        let dir = tempdir().expect("tempdir");
        run(
            Commands::Save(SaveArgs {
                section: "HeroSection".to_string(),
                config: None,
                code: None,
                css: None,
            }),
            dir.path(),
        )
        .await
        .expect("save");

        let export_args = |no_config| {
            Commands::Export(ExportArgs {
                sections: vec!["HeroSection".to_string()],
                format: ExportFormat::Source,
                package_name: "site".to_string(),
                description: String::new(),
                no_styles: false,
                no_config,
                out: dir.path().join("dist"),
            })
        };
        let read_bundle = || -> serde_json::Value {
            let text = stdfs::read_to_string(dir.path().join("dist/site.json")).expect("read");
            serde_json::from_str(&text).expect("json")
        };

        run(export_args(false), dir.path()).await.expect("export");
        assert!(read_bundle()["sections"][0]["config"].is_object());

        run(export_args(true), dir.path()).await.expect("export");
        assert!(read_bundle()["sections"][0].get("config").is_none());
    }

    #[tokio::test]
    async fn export_of_missing_section_fails() {
        let dir = tempdir().expect("tempdir");
        let err = run(
            Commands::Export(ExportArgs {
                sections: vec!["HeroSection".to_string()],
                format: ExportFormat::Source,
                package_name: "site".to_string(),
                description: String::new(),
                no_styles: false,
                no_config: false,
                out: dir.path().to_path_buf(),
            }),
            dir.path(),
        )
        .await;
        assert!(matches!(err, Err(Error::Builder(BuilderError::NotFound(_)))));
    }

    #[test]
    fn gallery_lists_by_category() {
        let mut out = Vec::new();
        gallery_cmd(
            &GalleryArgs {
                category: Some(gallery::Category::Footer),
            },
            &mut out,
        )
        .expect("gallery");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("footer-modern"));
    }
}
