use std::f64::consts::PI;
use std::fs;
use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use expo_guide::{
    comparison_chart, compute_metrics, roi_gauge, summary_table, ComparisonChart, GaugeSpec,
    MarkerColor, RoiInputs, VenueSelection, VenueTable, EXPORT_FILENAME,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exhibition venue guide and booth ROI calculator", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the exhibition venues with known taxi stands
    Venues(VenuesArgs),
    /// Show the taxi stand, map markers and navigation links for one venue
    Venue(VenueArgs),
    /// Simulate booth ROI and export the summary CSV and charts
    Roi(RoiArgs),
}

#[derive(Parser, Debug)]
struct VenuesArgs {
    /// Replacement venue table (JSON array)
    #[arg(long, value_hint = ValueHint::FilePath)]
    venues: Option<PathBuf>,

    /// Print the table as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Parser, Debug)]
struct VenueArgs {
    /// Venue key (e.g. `coex`) or full display name
    venue: String,

    /// Replacement venue table (JSON array)
    #[arg(long, value_hint = ValueHint::FilePath)]
    venues: Option<PathBuf>,

    /// Print the selection as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Output PNG marker map
    #[arg(long, value_hint = ValueHint::FilePath)]
    png: Option<PathBuf>,

    /// Output SVG marker map
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RoiArgs {
    /// Booth rental cost
    #[arg(long, default_value_t = RoiInputs::default().booth_cost)]
    booth: f64,

    /// Staffing cost
    #[arg(long, default_value_t = RoiInputs::default().staff_cost)]
    staff: f64,

    /// Marketing and print cost
    #[arg(long, default_value_t = RoiInputs::default().marketing_cost)]
    marketing: f64,

    /// Other costs (travel, shipping, ...)
    #[arg(long, default_value_t = RoiInputs::default().misc_cost)]
    misc: f64,

    /// Leads collected at the booth
    #[arg(long, default_value_t = RoiInputs::default().leads)]
    leads: u64,

    /// Lead to deal conversion rate in percent (0-100)
    #[arg(long, default_value_t = RoiInputs::default().conversion_rate_pct)]
    rate: f64,

    /// Average value of one closed deal
    #[arg(long, default_value_t = RoiInputs::default().deal_value)]
    deal_value: f64,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = EXPORT_FILENAME, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Output PNG figure path (defaults next to CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    png: Option<PathBuf>,

    /// Output SVG figure path
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,

    /// Disable chart generation
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Print metrics, summary and chart specs as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

impl RoiArgs {
    fn inputs(&self) -> RoiInputs {
        RoiInputs {
            booth_cost: self.booth,
            staff_cost: self.staff,
            marketing_cost: self.marketing,
            misc_cost: self.misc,
            leads: self.leads,
            conversion_rate_pct: self.rate,
            deal_value: self.deal_value,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Venues(args) => handle_venues(args),
        Command::Venue(args) => handle_venue(args),
        Command::Roi(args) => handle_roi(args),
    }
}

fn load_venue_table(path: Option<&Path>) -> Result<VenueTable> {
    let Some(path) = path else {
        return Ok(VenueTable::builtin());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read venue table {}", path.display()))?;
    let table = VenueTable::from_json(&text)
        .with_context(|| format!("invalid venue table {}", path.display()))?;
    info!("Loaded {} venues from {}", table.len(), path.display());
    Ok(table)
}

fn handle_venues(args: VenuesArgs) -> Result<()> {
    let table = load_venue_table(args.venues.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &table)?;
        writeln!(out)?;
        return Ok(());
    }
    for venue in table.venues() {
        writeln!(out, "{:<10} {}  ({})", venue.key, venue.name, venue.description)?;
    }
    Ok(())
}

fn handle_venue(args: VenueArgs) -> Result<()> {
    let table = load_venue_table(args.venues.as_deref())?;
    let selection = table.select(&args.venue).map_err(|err| {
        let known: Vec<&str> = table.venues().iter().map(|v| v.key.as_str()).collect();
        anyhow!("{err} (known venues: {})", known.join(", "))
    })?;
    debug!(
        "Selected {}: center {:?}, taxi {:?}",
        selection.name, selection.center, selection.taxi
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &selection)?;
        writeln!(out)?;
    } else {
        write_selection_text(&mut out, &selection)?;
    }

    for (path, kind) in [(&args.png, ChartKind::Png), (&args.svg, ChartKind::Svg)] {
        let Some(path) = path.as_ref() else {
            continue;
        };
        match render_guard(|| render_venue_map(&selection, path, kind)) {
            Ok(()) => info!("Wrote map: {}", path.display()),
            Err(err) => warn!("Skipping map render ({}): {}", path.display(), err),
        }
    }
    Ok(())
}

fn write_selection_text<W: Write>(out: &mut W, selection: &VenueSelection) -> Result<()> {
    writeln!(out, "{}", selection.name)?;
    writeln!(out, "  taxi stand: {}", selection.description)?;
    writeln!(
        out,
        "  venue:      {}, {}",
        selection.center.lat, selection.center.lng
    )?;
    writeln!(
        out,
        "  taxi:       {}, {} (~{:.0} m walk)",
        selection.taxi.lat, selection.taxi.lng, selection.walk_distance_m
    )?;
    writeln!(out, "  naver:      {}", selection.links.naver)?;
    writeln!(out, "  kakao:      {}", selection.links.kakao)?;
    Ok(())
}

fn handle_roi(args: RoiArgs) -> Result<()> {
    let to_stdout = args.output.as_os_str() == "-";
    if to_stdout && args.json {
        return Err(anyhow!("--json and `-o -` both write to stdout; choose one"));
    }
    let inputs = args.inputs();
    inputs.validate()?;

    let metrics = compute_metrics(&inputs);
    let summary = summary_table(&inputs, &metrics);
    let comparison = comparison_chart(&metrics);
    let gauge = roi_gauge(&metrics);
    info!(
        "ROI {:.1}%: cost {}, revenue {} from {} deals, profit {}, {:.2} per lead",
        metrics.roi_pct,
        metrics.total_cost,
        metrics.expected_revenue,
        metrics.expected_deals,
        metrics.profit,
        metrics.cost_per_lead
    );

    let csv = summary.to_csv()?;
    if to_stdout {
        io::stdout().lock().write_all(&csv)?;
    } else {
        fs::write(&args.output, &csv)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!("Wrote summary CSV: {}", args.output.display());
    }

    if args.json {
        let report = json!({
            "inputs": inputs,
            "metrics": metrics,
            "summary": summary,
            "comparison": comparison,
            "gauge": gauge,
        });
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else if !to_stdout {
        print!("{summary}");
    }

    if args.no_plot {
        return Ok(());
    }

    let mut targets: Vec<(PathBuf, ChartKind)> = Vec::new();
    if let Some(path) = args.png.as_ref() {
        targets.push((path.clone(), ChartKind::Png));
    } else if !to_stdout {
        let mut png_path = args.output.clone();
        png_path.set_extension("png");
        targets.push((png_path, ChartKind::Png));
    }
    if let Some(path) = args.svg.as_ref() {
        targets.push((path.clone(), ChartKind::Svg));
    }

    for (path, kind) in targets {
        let (comparison_path, gauge_path) = derive_chart_paths(&path);
        match render_guard(|| render_roi_charts(&comparison, &gauge, &path, kind)) {
            Ok(()) => info!(
                "Wrote charts: {}, {}",
                comparison_path.display(),
                gauge_path.display()
            ),
            Err(err) => warn!("Skipping chart render ({}): {}", path.display(), err),
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChartKind {
    Png,
    Svg,
}

/// Plotting backends can panic on missing system fonts; keep that from
/// taking down a run whose CSV was already written.
fn render_guard<F>(render: F) -> Result<(), String>
where
    F: FnOnce() -> Result<()>,
{
    panic::catch_unwind(panic::AssertUnwindSafe(render))
        .map_err(|_| "plotting backend panicked".to_string())?
        .map_err(|err| format!("plotting error: {err}"))
}

fn derive_chart_paths(base: &Path) -> (PathBuf, PathBuf) {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("roi");
    let ext = base.extension().and_then(|s| s.to_str()).unwrap_or("png");
    let comparison = base.with_file_name(format!("{stem}_comparison.{ext}"));
    let gauge = base.with_file_name(format!("{stem}_gauge.{ext}"));
    (comparison, gauge)
}

fn render_roi_charts(
    comparison: &ComparisonChart,
    gauge: &GaugeSpec,
    base_path: &Path,
    kind: ChartKind,
) -> Result<()> {
    let (comparison_path, gauge_path) = derive_chart_paths(base_path);
    match kind {
        ChartKind::Png => {
            let root = BitMapBackend::new(&comparison_path, (960, 640)).into_drawing_area();
            draw_comparison_chart(root, comparison)?;
            let root = BitMapBackend::new(&gauge_path, (800, 520)).into_drawing_area();
            draw_gauge_chart(root, gauge)?;
        }
        ChartKind::Svg => {
            let root = SVGBackend::new(&comparison_path, (960, 640)).into_drawing_area();
            draw_comparison_chart(root, comparison)?;
            let root = SVGBackend::new(&gauge_path, (800, 520)).into_drawing_area();
            draw_gauge_chart(root, gauge)?;
        }
    }
    Ok(())
}

fn render_venue_map(selection: &VenueSelection, path: &Path, kind: ChartKind) -> Result<()> {
    match kind {
        ChartKind::Png => {
            let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
            draw_venue_map(root, selection)
        }
        ChartKind::Svg => {
            let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
            draw_venue_map(root, selection)
        }
    }
}

fn hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let channel = |idx: usize| {
        digits
            .get(idx..idx + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(0), channel(2), channel(4))
}

fn marker_color(color: MarkerColor) -> RGBColor {
    match color {
        MarkerColor::Blue => RGBColor(30, 144, 255),
        MarkerColor::Red => RGBColor(220, 20, 60),
    }
}

fn draw_comparison_chart<DB>(root: DrawingArea<DB, Shift>, spec: &ComparisonChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let y_max = (spec.y_max() * 1.15).max(1.0);
    let labels: Vec<&str> = spec.bars.iter().map(|b| b.label.as_str()).collect();
    let bar_count = spec.bars.len() as u32;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(
            &spec.title,
            FontDesc::new(FontFamily::SansSerif, 26.0, FontStyle::Normal),
        )
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((0u32..bar_count).into_segmented(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(idx) => labels
                .get(*idx as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| format!("{:.0}", v))
        .label_style(FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Normal))
        .draw()?;

    chart.draw_series(spec.bars.iter().enumerate().map(|(idx, bar)| {
        let idx = idx as u32;
        let mut rect = Rectangle::new(
            [
                (SegmentValue::Exact(idx), 0.0),
                (SegmentValue::Exact(idx + 1), bar.value),
            ],
            hex_color(&bar.color).filled(),
        );
        rect.set_margin(0, 0, 40, 40);
        rect
    }))?;

    let value_font = TextStyle::from(FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Normal))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(spec.bars.iter().enumerate().map(|(idx, bar)| {
        Text::new(
            format!("{}", bar.value),
            (SegmentValue::CenterOf(idx as u32), bar.value),
            value_font.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Map a gauge value onto the upper half circle: range start at 180 degrees,
/// range end at 0 degrees.
fn gauge_angle(value: f64, range: (f64, f64)) -> f64 {
    let (lo, hi) = range;
    if hi <= lo {
        return PI;
    }
    let frac = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    PI * (1.0 - frac)
}

fn arc_band(from: f64, to: f64, range: (f64, f64), inner: f64, outer: f64) -> Vec<(f64, f64)> {
    const STEPS: usize = 48;
    let a0 = gauge_angle(from, range);
    let a1 = gauge_angle(to, range);
    let mut points = Vec::with_capacity(2 * (STEPS + 1));
    for i in 0..=STEPS {
        let a = a0 + (a1 - a0) * i as f64 / STEPS as f64;
        points.push((outer * a.cos(), outer * a.sin()));
    }
    for i in (0..=STEPS).rev() {
        let a = a0 + (a1 - a0) * i as f64 / STEPS as f64;
        points.push((inner * a.cos(), inner * a.sin()));
    }
    points
}

fn draw_gauge_chart<DB>(root: DrawingArea<DB, Shift>, spec: &GaugeSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            &spec.title,
            FontDesc::new(FontFamily::SansSerif, 26.0, FontStyle::Normal),
        )
        .build_cartesian_2d(-1.3..1.3, -0.45..1.15)?;

    for zone in &spec.zones {
        chart.draw_series(std::iter::once(Polygon::new(
            arc_band(zone.from, zone.to, spec.range, 0.65, 1.0),
            hex_color(&zone.color).filled(),
        )))?;
    }

    let threshold = gauge_angle(spec.threshold, spec.range);
    chart.draw_series(std::iter::once(PathElement::new(
        vec![
            (0.6 * threshold.cos(), 0.6 * threshold.sin()),
            (1.05 * threshold.cos(), 1.05 * threshold.sin()),
        ],
        ShapeStyle {
            color: hex_color(&spec.threshold_color).to_rgba(),
            filled: false,
            stroke_width: 4,
        },
    )))?;

    let needle = gauge_angle(spec.display_value, spec.range);
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (0.9 * needle.cos(), 0.9 * needle.sin())],
        ShapeStyle {
            color: RGBColor(50, 50, 50).to_rgba(),
            filled: false,
            stroke_width: 3,
        },
    )))?;
    chart.draw_series(std::iter::once(Circle::new(
        (0.0, 0.0),
        6,
        RGBColor(50, 50, 50).filled(),
    )))?;

    let tick_font = TextStyle::from(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .pos(Pos::new(HPos::Center, VPos::Top));
    let ticks = [spec.range.0, spec.threshold, spec.range.1];
    chart.draw_series(ticks.iter().map(|&tick| {
        let a = gauge_angle(tick, spec.range);
        let y = if a.sin() < 0.1 { -0.05 } else { 1.08 * a.sin() };
        Text::new(format!("{tick}"), (1.08 * a.cos(), y), tick_font.clone())
    }))?;

    let readout_font = TextStyle::from(FontDesc::new(FontFamily::SansSerif, 40.0, FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(std::iter::once(Text::new(
        format!("{:.1}%", spec.value),
        (0.0, -0.28),
        readout_font,
    )))?;

    root.present()?;
    Ok(())
}

fn draw_venue_map<DB>(root: DrawingArea<DB, Shift>, selection: &VenueSelection) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let lats = selection.markers.iter().map(|m| m.position.lat);
    let lngs = selection.markers.iter().map(|m| m.position.lng);
    let (lat_min, lat_max) = lats.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (lng_min, lng_max) = lngs.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = (lat_max - lat_min).max(lng_max - lng_min).max(0.0005) * 0.6;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(
            &selection.name,
            FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal),
        )
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((lng_min - pad)..(lng_max + pad), (lat_min - pad)..(lat_max + pad))?;

    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .x_desc("lng")
        .y_desc("lat")
        .x_label_formatter(&|v| format!("{:.4}", v))
        .y_label_formatter(&|v| format!("{:.4}", v))
        .label_style(FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal))
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![
            (selection.center.lng, selection.center.lat),
            (selection.taxi.lng, selection.taxi.lat),
        ],
        ShapeStyle {
            color: BLACK.mix(0.4),
            filled: false,
            stroke_width: 2,
        },
    )))?;

    let label_font = FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Normal);
    chart.draw_series(selection.markers.iter().map(|marker| {
        let color = marker_color(marker.color);
        EmptyElement::at((marker.position.lng, marker.position.lat))
            + Circle::new((0, 0), 9, color.filled())
            + Text::new(marker.label.clone(), (12, -8), label_font.clone())
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("arguments should parse")
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("expo_guide_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn roi_defaults_match_reference_inputs() {
        let Command::Roi(args) = parse(&["expo_guide", "roi"]).command else {
            panic!("expected roi subcommand");
        };
        assert_eq!(args.inputs(), RoiInputs::default());
        assert_eq!(args.output, PathBuf::from(EXPORT_FILENAME));
        assert!(!args.no_plot);
    }

    #[test]
    fn roi_flags_override_inputs() {
        let cli = parse(&[
            "expo_guide",
            "--verbose",
            "roi",
            "--booth",
            "1000",
            "--leads",
            "0",
            "--rate",
            "4.9",
            "--deal-value",
            "10",
            "-o",
            "-",
        ]);
        assert!(cli.verbose);
        let Command::Roi(args) = cli.command else {
            panic!("expected roi subcommand");
        };
        let inputs = args.inputs();
        assert_eq!(inputs.booth_cost, 1000.0);
        assert_eq!(inputs.leads, 0);
        assert_eq!(inputs.conversion_rate_pct, 4.9);
        assert_eq!(inputs.deal_value, 10.0);
        assert_eq!(args.output.as_os_str(), "-");
    }

    #[test]
    fn venue_takes_positional_identifier() {
        let Command::Venue(args) = parse(&["expo_guide", "venue", "bexco", "--json"]).command
        else {
            panic!("expected venue subcommand");
        };
        assert_eq!(args.venue, "bexco");
        assert!(args.json);
        assert!(args.png.is_none());
    }

    #[test]
    fn chart_paths_derive_from_base() {
        let (cmp, gauge) = derive_chart_paths(Path::new("out/exhibition_roi_simulation.png"));
        assert_eq!(cmp, PathBuf::from("out/exhibition_roi_simulation_comparison.png"));
        assert_eq!(gauge, PathBuf::from("out/exhibition_roi_simulation_gauge.png"));
        let (cmp, _) = derive_chart_paths(Path::new("roi.svg"));
        assert_eq!(cmp, PathBuf::from("roi_comparison.svg"));
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#EF553B"), RGBColor(0xEF, 0x55, 0x3B));
        assert_eq!(hex_color("00cc96"), RGBColor(0x00, 0xCC, 0x96));
        assert_eq!(hex_color("#zz"), RGBColor(0, 0, 0));
    }

    #[test]
    fn gauge_angle_spans_half_circle() {
        let range = (-100.0, 300.0);
        assert!((gauge_angle(-100.0, range) - PI).abs() < 1e-12);
        assert!(gauge_angle(300.0, range).abs() < 1e-12);
        assert!((gauge_angle(0.0, range) - 0.75 * PI).abs() < 1e-12);
        assert_eq!(gauge_angle(10_000.0, range), gauge_angle(300.0, range));
    }

    #[test]
    fn arc_band_closes_between_radii() {
        let band = arc_band(-100.0, 0.0, (-100.0, 300.0), 0.5, 1.0);
        assert_eq!(band.len(), 98);
        let (x, y) = band[0];
        assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-12);
        let (x, y) = band[band.len() - 1];
        assert!(((x * x + y * y).sqrt() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn roi_writes_csv_matching_core_export() {
        let dir = scratch_dir("roi_csv");
        let output = dir.join("sim.csv");
        let out_arg = output.to_string_lossy().to_string();
        let Command::Roi(args) =
            parse(&["expo_guide", "roi", "--no-plot", "-o", out_arg.as_str()]).command
        else {
            panic!("expected roi subcommand");
        };
        handle_roi(args).unwrap();

        let inputs = RoiInputs::default();
        let expected = summary_table(&inputs, &compute_metrics(&inputs))
            .to_csv()
            .unwrap();
        assert_eq!(fs::read(&output).unwrap(), expected);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn roi_refuses_csv_and_json_on_stdout_together() {
        let Command::Roi(args) =
            parse(&["expo_guide", "roi", "--json", "--no-plot", "-o", "-"]).command
        else {
            panic!("expected roi subcommand");
        };
        let err = handle_roi(args).unwrap_err();
        assert!(err.to_string().contains("--json"));
    }

    #[test]
    fn roi_rejects_rate_above_hundred() {
        let Command::Roi(args) =
            parse(&["expo_guide", "roi", "--rate", "120", "--no-plot", "-o", "-"]).command
        else {
            panic!("expected roi subcommand");
        };
        let err = handle_roi(args).unwrap_err();
        assert!(err.to_string().contains("conversion rate"));
    }

    #[test]
    fn venue_table_loads_from_file() {
        let dir = scratch_dir("venues");
        let path = dir.join("venues.json");
        fs::write(
            &path,
            r#"[{"key": "setec", "name": "SETEC", "center": [37.4946, 127.0713],
                "taxi": [37.495, 127.072], "desc": "정문 앞"}]"#,
        )
        .unwrap();
        let table = load_venue_table(Some(path.as_path())).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("setec").is_some());
        assert!(load_venue_table(Some(dir.join("missing.json").as_path())).is_err());
        assert_eq!(load_venue_table(None).unwrap(), VenueTable::builtin());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn selection_text_lists_both_links() {
        let selection = VenueTable::builtin().select("coex").unwrap();
        let mut buf = Vec::new();
        write_selection_text(&mut buf, &selection).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("코엑스 동문 앞 대로변"));
        assert!(text.contains(&selection.links.naver));
        assert!(text.contains(&selection.links.kakao));
    }
}
