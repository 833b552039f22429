use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vnscene::assets::image_ref::image_ref_from_path;
use vnscene::export::{EXPORT_FILE_NAME, ExportJob, ExportOpts, ExportRequest};
use vnscene::persist::autosave::{Autosave, restore_or_default};
use vnscene::persist::kv::FileKv;
use vnscene::persist::project::{PROJECT_FILE_NAME, load_project, save_project};
use vnscene::resolve::resolver::resolve;
use vnscene::scene::edit::{BoxEdit, StyleEdit, TextEdit, TextTarget, apply_edits};
use vnscene::scene::state::{ImageScale, ScenePatch, SceneState};
use vnscene::style::schema::{BoxKind, FontFamily, TextAlign};
use vnscene::template::builtin::list_builtins;
use vnscene::template::model::CustomTemplateId;
use vnscene::template::registry::{
    TemplateSource, apply, delete_template, find, rename_template, save_as_template,
};
use vnscene::{Canvas, SceneStore};

#[derive(Parser, Debug)]
#[command(name = "vnscene", version)]
struct Cli {
    /// Directory holding the autosave slot.
    #[arg(long, default_value = ".vnscene", global = true)]
    state_dir: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current scene as JSON.
    Show,
    /// Change scene text or the background image.
    Set(SetArgs),
    /// Edit the live template's styling.
    #[command(subcommand)]
    Style(StyleCommand),
    /// List built-in and saved templates.
    Templates,
    /// Replace the live template with a built-in or saved one.
    Apply { id: String },
    /// Save the live template under a new custom id.
    SaveTemplate { name: String },
    /// Rename a saved template.
    RenameTemplate { id: String, name: String },
    /// Delete a saved template. Built-in and unknown ids are left alone.
    DeleteTemplate { id: String },
    /// Print the resolved render plan and its estimated layout.
    Plan(CanvasArgs),
    /// Write the scene to a project file.
    Save {
        #[arg(long, default_value = PROJECT_FILE_NAME)]
        out: PathBuf,
    },
    /// Replace the scene with a project file.
    Load { path: PathBuf },
    /// Render the scene to a PNG.
    Export(ExportArgs),
    /// Restore the default scene.
    Reset {
        /// Also drop saved templates.
        #[arg(long)]
        all: bool,
    },
}

#[derive(Args, Debug)]
struct SetArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    dialogue: Option<String>,
    #[arg(long)]
    secondary: Option<String>,
    /// Image file to embed as the background.
    #[arg(long, conflicts_with = "clear_image")]
    image: Option<PathBuf>,
    #[arg(long)]
    clear_image: bool,
    #[arg(long, value_enum)]
    image_scale: Option<ImageScale>,
}

#[derive(Subcommand, Debug)]
enum StyleCommand {
    /// Style one text line.
    Text(TextStyleArgs),
    /// Style the dialogue box.
    Box(BoxStyleArgs),
}

#[derive(Args, Debug)]
struct TextStyleArgs {
    #[arg(long, value_enum)]
    target: TextTarget,
    #[arg(long, value_enum)]
    font: Option<FontFamily>,
    /// Clamped to 12..=72.
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    outline: Option<bool>,
    #[arg(long)]
    italic: Option<bool>,
}

#[derive(Args, Debug)]
struct BoxStyleArgs {
    #[arg(long, value_enum)]
    kind: Option<BoxKind>,
    #[arg(long)]
    color: Option<String>,
    /// Clamped to 0..=100.
    #[arg(long, allow_negative_numbers = true)]
    opacity: Option<i64>,
    /// Clamped to 0..=50.
    #[arg(long, allow_negative_numbers = true)]
    padding: Option<i64>,
    #[arg(long, value_enum)]
    align: Option<TextAlign>,
}

#[derive(Args, Debug)]
struct CanvasArgs {
    #[arg(long, default_value_t = Canvas::PREVIEW.width)]
    width: u32,
    #[arg(long, default_value_t = Canvas::PREVIEW.height)]
    height: u32,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long, default_value = EXPORT_FILE_NAME)]
    out: PathBuf,
    /// Directory with the family font files. Overrides `VNSCENE_FONTS_DIR`.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
    /// Supersampling factor. Overrides `VNSCENE_EXPORT_SCALE`.
    #[arg(long)]
    scale: Option<u32>,
    #[command(flatten)]
    canvas: CanvasArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut store = open_store(&cli.state_dir)?;
    match cli.cmd {
        Command::Show => print_json(store.get()),
        Command::Set(args) => cmd_set(&mut store, args),
        Command::Style(cmd) => cmd_style(&mut store, cmd),
        Command::Templates => cmd_templates(store.get()),
        Command::Apply { id } => cmd_apply(&mut store, &id),
        Command::SaveTemplate { name } => cmd_save_template(&mut store, &name),
        Command::RenameTemplate { id, name } => {
            if let Some(id) = saved_id(store.get(), &id, "rename-template") {
                store.transition(|s| rename_template(s, &id, &name));
            }
            Ok(())
        }
        Command::DeleteTemplate { id } => {
            if let Some(id) = saved_id(store.get(), &id, "delete-template") {
                store.transition(|s| delete_template(s, &id));
            }
            Ok(())
        }
        Command::Plan(args) => cmd_plan(store.get(), &args),
        Command::Save { out } => {
            save_project(store.get(), &out)
                .with_context(|| format!("save project '{}'", out.display()))?;
            println!("{}", out.display());
            Ok(())
        }
        Command::Load { path } => {
            load_project(&mut store, &path)
                .with_context(|| format!("load project '{}'", path.display()))?;
            Ok(())
        }
        Command::Export(args) => cmd_export(store.get(), args),
        Command::Reset { all } => {
            store.transition(|s| SceneState {
                saved_templates: if all {
                    Vec::new()
                } else {
                    s.saved_templates.clone()
                },
                ..SceneState::default()
            });
            Ok(())
        }
    }
}

fn open_store(state_dir: &Path) -> anyhow::Result<SceneStore> {
    let kv = FileKv::open(state_dir)
        .with_context(|| format!("open state dir '{}'", state_dir.display()))?;
    let state = restore_or_default(&kv);
    Ok(SceneStore::new(state).with_listener(Autosave::new(kv)))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("encode JSON")?;
    println!("{s}");
    Ok(())
}

fn cmd_set(store: &mut SceneStore, args: SetArgs) -> anyhow::Result<()> {
    let mut patch = ScenePatch::default();
    if let Some(v) = args.name {
        patch = patch.character_name(v);
    }
    if let Some(v) = args.dialogue {
        patch = patch.dialogue(v);
    }
    if let Some(v) = args.secondary {
        patch = patch.secondary_dialogue(v);
    }
    if let Some(path) = &args.image {
        let image = image_ref_from_path(path)
            .with_context(|| format!("embed image '{}'", path.display()))?;
        patch = patch.image(Some(image));
    } else if args.clear_image {
        patch = patch.image(None);
    }
    if let Some(v) = args.image_scale {
        patch = patch.image_scale(v);
    }
    if patch.is_empty() {
        anyhow::bail!("nothing to set");
    }
    store.update(patch);
    Ok(())
}

fn cmd_style(store: &mut SceneStore, cmd: StyleCommand) -> anyhow::Result<()> {
    let mut edits = Vec::new();
    match cmd {
        StyleCommand::Text(a) => {
            let t = a.target;
            edits.extend(a.font.map(|v| StyleEdit::Text(t, TextEdit::FontFamily(v))));
            edits.extend(a.size.map(|v| StyleEdit::Text(t, TextEdit::FontSize(v))));
            edits.extend(a.color.map(|v| StyleEdit::Text(t, TextEdit::Color(v))));
            edits.extend(a.outline.map(|v| StyleEdit::Text(t, TextEdit::Outline(v))));
            edits.extend(a.italic.map(|v| StyleEdit::Text(t, TextEdit::Italic(v))));
        }
        StyleCommand::Box(a) => {
            edits.extend(a.kind.map(|v| StyleEdit::Box(BoxEdit::Kind(v))));
            edits.extend(a.color.map(|v| StyleEdit::Box(BoxEdit::BackgroundColor(v))));
            edits.extend(a.opacity.map(|v| StyleEdit::Box(BoxEdit::Opacity(v))));
            edits.extend(a.padding.map(|v| StyleEdit::Box(BoxEdit::Padding(v))));
            edits.extend(a.align.map(|v| StyleEdit::Box(BoxEdit::TextAlign(v))));
        }
    }
    if edits.is_empty() {
        anyhow::bail!("no style changes given");
    }
    store.transition(|s| apply_edits(s, &edits));
    Ok(())
}

fn cmd_templates(state: &SceneState) -> anyhow::Result<()> {
    for t in list_builtins() {
        println!("{}\t{}\tbuilt-in", t.id, t.name);
    }
    for t in &state.saved_templates {
        println!("{}\t{}\tsaved", t.id, t.name);
    }
    Ok(())
}

fn cmd_apply(store: &mut SceneStore, id: &str) -> anyhow::Result<()> {
    if find(store.get(), id).is_none() {
        tracing::warn!(id, "apply: unknown template, nothing applied");
        return Ok(());
    }
    store.transition(|s| apply(TemplateSource::Id(id), s));
    Ok(())
}

fn cmd_save_template(store: &mut SceneStore, name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        tracing::warn!("save-template: blank name, nothing saved");
        return Ok(());
    }
    let state = store.transition(|s| save_as_template(s, name));
    if let Some(saved) = state.saved_templates.last() {
        println!("{}", saved.id);
    }
    Ok(())
}

/// The saved template `id` names, or `None` (logged) for built-in and unknown ids.
fn saved_id(state: &SceneState, id: &str, command: &str) -> Option<CustomTemplateId> {
    let found =
        CustomTemplateId::parse(id).filter(|c| state.saved(c.as_id().as_str()).is_some());
    if found.is_none() {
        tracing::warn!(id, command, "no saved template with this id, nothing changed");
    }
    found
}

fn cmd_plan(state: &SceneState, args: &CanvasArgs) -> anyhow::Result<()> {
    let canvas = Canvas::new(args.width, args.height)?;
    let plan = resolve(state);
    let layout = plan.layout_estimate(canvas);
    print_json(&serde_json::json!({
        "canvas": canvas,
        "plan": plan,
        "layout": layout,
    }))
}

fn cmd_export(state: &SceneState, args: ExportArgs) -> anyhow::Result<()> {
    let mut opts = ExportOpts::from_env()
        .with_canvas(Canvas::new(args.canvas.width, args.canvas.height)?);
    if let Some(dir) = args.fonts_dir {
        opts = opts.with_fonts_dir(dir);
    }
    if let Some(scale) = args.scale {
        opts = opts.with_scale(scale);
    }

    let job = ExportJob::spawn(ExportRequest::from_state(state), opts, args.out)?;
    let written = job.wait().context("export scene")?;
    println!("{}", written.display());
    Ok(())
}
