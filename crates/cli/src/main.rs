//! iconview - lay out and render file icons the way the icon view does.
//!
//! Items are built from file names on the command line, with a generated
//! square image standing in for the icon. Output goes to stdout: bounds as
//! JSON, display lists one paint operation per line.

mod logger;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use canvas::{ContainerConfig, IconContainer, ItemId, ZoomLevel};
use clap::{Parser, Subcommand};
use icon_item::{DisplayList, IconItem, ItemEvent, SurfaceId};
use iconview_core::{color, Bounds, IRect};
use image::{DynamicImage, Rgba, RgbaImage};
use log::LevelFilter;
use serde::Serialize;
use text_layout::prepare_label_text;
use theme::Theme;

use crate::logger::{log_section, IconviewLogger};

/// Character shown where a label may wrap.
const BREAK_MARKER: char = '|';

#[derive(Parser)]
#[command(name = "iconview")]
#[command(about = "Lay out and render file icons")]
struct Cli {
    /// Container settings (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Theme colors (JSON)
    #[arg(short, long, global = true)]
    theme: Option<PathBuf>,

    /// Level for the log file in ~/.iconview/logs
    #[arg(long, default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

/// Items to place on the canvas.
#[derive(clap::Args)]
struct ItemArgs {
    /// File names, one item each
    #[arg(required = true)]
    names: Vec<String>,

    /// Additional label text, matched to the names in order
    #[arg(long = "info")]
    info: Vec<String>,

    /// Width of the canvas, in world units
    #[arg(long, default_value_t = 400.0)]
    width: f64,

    #[arg(long, default_value = "standard")]
    zoom: ZoomLevel,

    /// Side of the generated icon images, in pixels
    #[arg(long, default_value_t = 48)]
    icon_size: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay items out in a grid and print their bounds as JSON
    Layout {
        #[command(flatten)]
        items: ItemArgs,
    },

    /// Lay items out and print the paint operations of a full redraw
    Render {
        #[command(flatten)]
        items: ItemArgs,

        /// Select the item at this index
        #[arg(long)]
        select: Vec<usize>,

        /// Hover the item at this index
        #[arg(long)]
        hover: Option<usize>,

        /// Give the item at this index the keyboard focus
        #[arg(long)]
        focus: Option<usize>,

        /// Draw as if the canvas did not have input focus
        #[arg(long)]
        unfocused: bool,
    },

    /// Print a label with its wrap opportunities marked
    Wrap { text: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = IconviewLogger::init(cli.log_level) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    match &cli.command {
        Commands::Layout { items } => {
            log_section("layout");
            let report = layout(&cli, items)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Render {
            items,
            select,
            hover,
            focus,
            unfocused,
        } => {
            log_section("render");
            let view = ViewState {
                select,
                hover: *hover,
                focus: *focus,
                has_focus: !*unfocused,
            };
            print!("{}", render(&cli, items, &view)?);
        }
        Commands::Wrap { text } => println!("{}", wrap(text)),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ContainerConfig> {
    match path {
        Some(path) => ContainerConfig::load(path).with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ContainerConfig::default()),
    }
}

fn load_theme(path: Option<&Path>) -> Result<Theme> {
    let Some(path) = path else {
        return Ok(Theme::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read theme {}", path.display()))?;
    Theme::from_json(&json).with_context(|| format!("Failed to parse theme {}", path.display()))
}

fn icon_image(size: u32, theme: &Theme) -> Rc<DynamicImage> {
    let pixel = Rgba(color::to_rgba8(theme.active_background));
    Rc::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, pixel)))
}

/// A container holding one item per name, laid out in a grid and updated.
fn build_container(cli: &Cli, args: &ItemArgs) -> Result<(IconContainer, Vec<ItemId>)> {
    if args.info.len() > args.names.len() {
        bail!("{} --info values for {} names", args.info.len(), args.names.len());
    }
    if args.icon_size == 0 {
        bail!("--icon-size must be at least 1");
    }

    let config = load_config(cli.config.as_deref())?;
    let theme = load_theme(cli.theme.as_deref())?;
    let image = icon_image(args.icon_size, &theme);

    let mut container = IconContainer::new(config, theme);
    container.set_zoom_level(args.zoom);

    let mut ids = Vec::with_capacity(args.names.len());
    for (index, name) in args.names.iter().enumerate() {
        let mut item = IconItem::new();
        item.set_image(Some(Rc::clone(&image)))?;
        item.set_editable_text(Some(name));
        item.set_additional_text(args.info.get(index).map(String::as_str));
        ids.push(container.add_item(item));
    }

    container.lay_out_grid(args.width);
    container.update();
    log::info!("placed {} items at zoom {}", ids.len(), args.zoom);
    Ok((container, ids))
}

#[derive(Debug, Serialize)]
struct RectReport {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl From<Bounds> for RectReport {
    fn from(bounds: Bounds) -> Self {
        Self {
            x0: bounds.min.x,
            y0: bounds.min.y,
            x1: bounds.max.x,
            y1: bounds.max.y,
        }
    }
}

#[derive(Debug, Serialize)]
struct ItemReport {
    id: u64,
    name: String,
    position: [f64; 2],
    /// What is drawn now
    display: RectReport,
    /// Space taken in the grid
    layout: RectReport,
    /// With the whole label shown
    entire: RectReport,
    entire_text: bool,
}

fn layout(cli: &Cli, args: &ItemArgs) -> Result<Vec<ItemReport>> {
    let (mut container, ids) = build_container(cli, args)?;

    let mut report = Vec::with_capacity(ids.len());
    for id in ids {
        let item_report = container.with_item(id, |item, env| ItemReport {
            id: id.as_u64(),
            name: item.editable_text().unwrap_or_default().to_string(),
            position: item.position().to_array(),
            display: item.bounds(env).into(),
            layout: item.bounds_for_layout(env).into(),
            entire: item.bounds_for_entire_item(env).into(),
            entire_text: item.shows_entire_text(),
        });
        report.extend(item_report);
    }
    Ok(report)
}

struct ViewState<'a> {
    select: &'a [usize],
    hover: Option<usize>,
    focus: Option<usize>,
    has_focus: bool,
}

fn render(cli: &Cli, args: &ItemArgs, view: &ViewState<'_>) -> Result<DisplayList> {
    let (mut container, ids) = build_container(cli, args)?;
    let item_at = |index: usize, what: &str| {
        ids.get(index)
            .copied()
            .with_context(|| format!("--{what} {index}: there are only {} items", ids.len()))
    };

    container.set_has_focus(view.has_focus);
    for &index in view.select {
        container.set_selected(item_at(index, "select")?, true);
    }
    if let Some(index) = view.focus {
        container.set_keyboard_focus(Some(item_at(index, "focus")?));
    }
    if let Some(index) = view.hover {
        container.send_event(item_at(index, "hover")?, ItemEvent::Enter { surface: SurfaceId(0) });
    }
    container.update();

    let clip = container
        .items()
        .map(|(_, item)| item.canvas_extent())
        .fold(IRect::zero(), |all, extent| all.union(&extent));
    let mut list = DisplayList::with_size(clip.size());
    container.draw(&mut list, clip);
    log::debug!("rendered {} paint operations", list.len());
    Ok(list)
}

fn wrap(text: &str) -> String {
    prepare_label_text(text).with_visible_breaks(BREAK_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_item::DrawOp;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("iconview").chain(args.iter().copied())).unwrap()
    }

    fn item_args(cli: &Cli) -> &ItemArgs {
        match &cli.command {
            Commands::Layout { items } | Commands::Render { items, .. } => items,
            Commands::Wrap { .. } => panic!("no items"),
        }
    }

    #[test]
    fn test_parse_arguments() {
        let cli = parse(&["layout", "a.txt", "b.png", "--info", "2 KB", "--zoom", "larger"]);
        let args = item_args(&cli);
        assert_eq!(args.names, vec!["a.txt", "b.png"]);
        assert_eq!(args.info, vec!["2 KB"]);
        assert_eq!(args.zoom, ZoomLevel::Larger);
        assert_eq!(args.icon_size, 48);
        assert_eq!(cli.log_level, LevelFilter::Info);

        assert!(Cli::try_parse_from(["iconview", "layout"]).is_err());
        assert!(Cli::try_parse_from(["iconview", "layout", "a", "--zoom", "huge"]).is_err());
    }

    #[test]
    fn test_layout_reports_every_item() {
        let cli = parse(&["layout", "one", "two", "three", "--width", "60"]);
        let report = layout(&cli, item_args(&cli)).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[1].name, "two");
        assert!(report[0].display.x1 > report[0].display.x0);
        // one item per row; only the last row shows its entire text
        assert!(report[1].position[1] > report[0].position[1]);
        assert!(!report[0].entire_text);
        assert!(report[2].entire_text);
    }

    #[test]
    fn test_render_selected_item() {
        let cli = parse(&["render", "notes.txt", "photo.jpg", "--select", "1", "--focus", "1"]);
        let Commands::Render {
            items,
            select,
            hover,
            focus,
            unfocused,
        } = &cli.command
        else {
            panic!("expected render");
        };
        let view = ViewState {
            select,
            hover: *hover,
            focus: *focus,
            has_focus: !*unfocused,
        };
        let list = render(&cli, items, &view).unwrap();

        let images = list.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. })).count();
        assert_eq!(images, 2);
        assert!(list.ops.iter().any(|op| matches!(op, DrawOp::Focus { .. })));
        assert!(list.ops.iter().any(|op| matches!(op, DrawOp::Background { .. })));
        assert!(list.text_lines().any(|line| line == "photo.jpg"));
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let cli = parse(&["render", "a", "--select", "3"]);
        let view = ViewState {
            select: &[3],
            hover: None,
            focus: None,
            has_focus: true,
        };
        assert!(render(&cli, item_args(&cli), &view).is_err());
    }

    #[test]
    fn test_wrap_marks_breaks() {
        assert_eq!(wrap("foo_bar"), "foo_|bar");
        assert_eq!(wrap("192.168.1.1"), "192.|168.1.1");
    }
}
