//! Chart file reader: pest pairs into [`ChartConfig`]s

use miette::SourceSpan;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use super::ChartConfig;
use crate::coords::CoordinateSystem;
use crate::errors::{ChartFileError, ParseError, SourceContext};
use crate::log::{debug, trace};
use crate::projection::ProjectionKind;

#[derive(Parser)]
#[grammar = "config/chart.pest"]
struct ChartFileParser;

/// Every setting this reader understands
const KEYS: &[&str] = &[
    "ra_central",
    "dec_central",
    "galactic_l_central",
    "galactic_b_central",
    "alt_central",
    "az_central",
    "position_angle",
    "projection",
    "coords",
    "angular_width",
    "width",
    "aspect",
    "output_dpi",
    "title",
    "font_size",
    "label_font_size_scaling",
    "multilatitude_strips",
    "show_horizon",
    "horizon_latitude",
    "horizon_longitude",
    "julian_date",
];

/// Settings that belong to catalogue and decoration layers. They are
/// accepted so existing chart files still load, and otherwise ignored.
const FOREIGN_KEYS: &[&str] = &[
    "text",
    "axis_ticks_value_only",
    "axis_label",
    "output_filename",
    "galaxy_map_filename",
    "photo_filename",
    "copyright",
    "language",
    "show_zenith",
    "horizon_zenith_marker_size",
    "horizon_zenith_col",
    "horizon_cardinal_points_marker_col",
    "horizon_cardinal_points_labels_col",
    "horizon_cardinal_points_marker_size",
    "horizon_cardinal_points_marker_count",
    "horizon_cardinal_points_marker_elevate",
    "meteor_radiant",
    "meteor_radiant_marker_size",
    "meteor_radiant_colour",
    "show_solar_system",
    "solar_system_labels",
    "solar_system_ids",
    "solar_system_col",
    "solar_system_show_moon_phase",
    "solar_system_moon_earthshine_intensity",
    "solar_system_moon_colour",
    "shade_twilight",
    "shade_near_sun",
    "shade_not_observable",
    "twilight_zenith_col",
    "twilight_horizon_col",
    "copyright_gap",
    "copyright_gap_2",
    "constellation_stick_col",
    "grid_col",
    "constellation_boundary_col",
    "ephemeris_col",
    "ephemeris_arrow_col",
    "ephemeris_label_col",
    "dso_cluster_col",
    "dso_galaxy_col",
    "dso_nebula_col",
    "dso_label_col",
    "dso_outline_col",
    "constellation_label_col",
    "zodiacal_only",
    "grid_coords",
    "show_grid_lines",
    "x_label_slant",
    "y_label_slant",
    "constellation_boundaries",
    "constellation_sticks",
    "constellation_stick_design",
    "constellation_highlight",
    "plot_stars",
    "messier_only",
    "plot_dso",
    "constellation_names",
    "star_names",
    "star_catalogue_numbers",
    "star_bayer_labels",
    "star_flamsteed_labels",
    "star_variable_labels",
    "star_allow_multiple_labels",
    "star_catalogue",
    "star_mag_labels",
    "star_label_mag_min",
    "dso_display_style",
    "dso_label_mag_min",
    "dso_names",
    "dso_mags",
    "dso_mag_min",
    "mag_min",
    "mag_max",
    "mag_step",
    "mag_alpha",
    "mag_size_norm",
    "maximum_star_count",
    "maximum_star_label_count",
    "maximum_dso_count",
    "maximum_dso_label_count",
    "plot_ecliptic",
    "label_ecliptic",
    "plot_galactic_plane",
    "plot_equator",
    "ecliptic_col",
    "galactic_plane_col",
    "equator_col",
    "plot_galaxy_map",
    "galaxy_map_width_pixels",
    "galaxy_col",
    "galaxy_col0",
    "star_col",
    "star_label_col",
    "magnitude_key",
    "great_circle_key",
    "dso_symbol_key",
    "cardinals",
    "draw_ephemeris",
    "ephemeris_epochs",
    "ephemeris_epoch_labels",
    "ephemeris_style",
    "ephemeris_arrow_shadow",
    "ephemeris_autoscale",
    "ephemeris_table",
    "must_show_all_ephemeris_labels",
    "scale_bar",
    "scale_bar_col",
    "font_family",
    "great_circle_line_width",
    "great_circle_dotted",
    "grid_line_width",
    "dso_point_size_scaling",
    "constellations_capitalise",
    "constellations_label_shadow",
    "constellation_sticks_line_width",
    "chart_edge_line_width",
    "chart_edge_line_col",
];

const PROJECTIONS: &str = "gnomonic, flat, peters, multilatitude, stereographic, sphere or alt_az";
const COORDS: &str = "ra_dec, galactic or alt_az";

/// A config plus which of its defaults were chosen explicitly.
/// Picking a projection only adjusts the ones that were not.
#[derive(Clone, Debug, Default)]
struct Slot {
    config: ChartConfig,
    aspect_set: bool,
    width_set: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Start,
    Defaults,
    Chart,
}

struct Reader<'a> {
    ctx: &'a SourceContext,
    section: Section,
    defaults: Slot,
    chart: Slot,
    charts: Vec<ChartConfig>,
}

/// Read every chart described in a chart file.
///
/// `DEFAULTS` sections set values inherited by each later `CHART`; each
/// `CHART` section starts from the defaults in force at its heading. Every
/// chart is validated before it is returned.
pub fn parse_charts(name: &str, source: &str) -> Result<Vec<ChartConfig>, ChartFileError> {
    let ctx = SourceContext::new(name, source);
    let file = ChartFileParser::parse(Rule::file, source)
        .map_err(|e| syntax_error(&ctx, e))?
        .next()
        .ok_or_else(|| ParseError::Syntax {
            message: "empty parse".to_string(),
            src: ctx.named_source(),
            span: (0, 0).into(),
        })?;

    let mut reader = Reader {
        ctx: &ctx,
        section: Section::Start,
        defaults: Slot::default(),
        chart: Slot::default(),
        charts: Vec::new(),
    };

    for pair in file.into_inner() {
        match pair.as_rule() {
            Rule::heading => reader.heading(pair),
            Rule::setting => reader.setting(pair)?,
            _ => {}
        }
    }
    reader.close_chart();

    debug!("read {} chart(s) from {}", reader.charts.len(), name);

    for (i, chart) in reader.charts.iter().enumerate() {
        chart
            .validate()
            .map_err(|source| ChartFileError::Invalid { index: i + 1, source })?;
    }
    Ok(reader.charts)
}

fn syntax_error(ctx: &SourceContext, e: pest::error::Error<Rule>) -> ParseError {
    let span: SourceSpan = match e.location {
        pest::error::InputLocation::Pos(p) => (p, 0).into(),
        pest::error::InputLocation::Span((s, end)) => (s, end - s).into(),
    };
    ParseError::Syntax {
        message: e.variant.message().into_owned(),
        src: ctx.named_source(),
        span,
    }
}

fn span_of(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

impl Reader<'_> {
    fn close_chart(&mut self) {
        if self.section == Section::Chart {
            self.charts.push(self.chart.config.clone());
        }
    }

    fn heading(&mut self, pair: Pair<Rule>) {
        self.close_chart();
        let is_chart = pair.into_inner().any(|p| p.as_rule() == Rule::chart_kw);
        if is_chart {
            self.chart = self.defaults.clone();
            self.section = Section::Chart;
        } else {
            self.section = Section::Defaults;
        }
    }

    fn setting(&mut self, pair: Pair<Rule>) -> Result<(), ParseError> {
        let setting_span = span_of(&pair);
        let mut inner = pair.into_inner();
        let (Some(key_pair), Some(value_pair)) = (inner.next(), inner.next()) else {
            return Err(ParseError::Syntax {
                message: "expected `key=value`".to_string(),
                src: self.ctx.named_source(),
                span: setting_span,
            });
        };
        let key = key_pair.as_str();
        let value = value_pair.as_str().trim_end();
        let key_span = span_of(&key_pair);
        let value_span = span_of(&value_pair);

        let ctx = self.ctx;
        let slot = match self.section {
            Section::Start => {
                return Err(ParseError::SettingOutsideSection {
                    key: key.to_string(),
                    src: ctx.named_source(),
                    span: key_span,
                });
            }
            Section::Defaults => &mut self.defaults,
            Section::Chart => &mut self.chart,
        };

        trace!("{:?}: {} = {}", self.section, key, value);

        let number = || -> Result<f64, ParseError> {
            value.trim().parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                key: key.to_string(),
                value: value.to_string(),
                src: ctx.named_source(),
                span: value_span,
            })
        };
        let choice = |expected: &str| ParseError::InvalidChoice {
            key: key.to_string(),
            value: value.to_string(),
            src: ctx.named_source(),
            span: value_span,
            expected: format!("expected one of: {expected}"),
        };

        let cfg = &mut slot.config;
        match key {
            "ra_central" => cfg.ra_central = number()?.rem_euclid(24.0),
            "dec_central" => cfg.dec_central = number()?.clamp(-90.0, 90.0),
            "galactic_l_central" => cfg.galactic_l_central = number()?,
            "galactic_b_central" => cfg.galactic_b_central = number()?.clamp(-90.0, 90.0),
            "alt_central" => cfg.alt_central = number()?.clamp(-90.0, 90.0),
            "az_central" => cfg.az_central = number()?,
            "position_angle" => cfg.position_angle = number()?,
            "angular_width" => {
                cfg.angular_width = number()?;
                slot.width_set = true;
            }
            "width" => cfg.width = number()?,
            "aspect" => {
                cfg.aspect = number()?;
                slot.aspect_set = true;
            }
            "output_dpi" => cfg.dpi = number()?,
            "title" => cfg.title = Some(value.trim().to_string()).filter(|t| !t.is_empty()),
            "font_size" => cfg.font_size = number()?,
            "label_font_size_scaling" => cfg.label_font_size_scaling = number()?,
            "multilatitude_strips" => {
                let n = number()?;
                if n.fract() != 0.0 || !(0.0..=u32::MAX as f64).contains(&n) {
                    return Err(ParseError::InvalidNumber {
                        key: key.to_string(),
                        value: value.to_string(),
                        src: ctx.named_source(),
                        span: value_span,
                    });
                }
                cfg.multilatitude_strips = n as u32;
            }
            "show_horizon" => cfg.show_horizon = number()? != 0.0,
            "horizon_latitude" => cfg.horizon_latitude = number()?,
            "horizon_longitude" => cfg.horizon_longitude = number()?,
            "julian_date" => cfg.julian_date = Some(number()?),
            "coords" => {
                cfg.coords = match value.trim() {
                    "ra_dec" => CoordinateSystem::RaDec,
                    "galactic" => CoordinateSystem::Galactic,
                    "alt_az" => CoordinateSystem::AltAz,
                    _ => return Err(choice(COORDS)),
                }
            }
            "projection" => {
                // (kind, aspect, angular width) applied unless set explicitly
                let (kind, aspect, width) = match value.trim() {
                    "gnomonic" | "flat" => (ProjectionKind::Flat, None, None),
                    "peters" => (
                        ProjectionKind::Cylindrical,
                        Some(4.0 / std::f64::consts::TAU),
                        Some(360.0),
                    ),
                    "multilatitude" => (ProjectionKind::MultiLatitude, Some(0.5), Some(360.0)),
                    "stereographic" => (ProjectionKind::Spherical, None, None),
                    "sphere" | "alt_az" => (ProjectionKind::Spherical, Some(1.0), Some(180.0)),
                    _ => return Err(choice(PROJECTIONS)),
                };
                cfg.projection = kind;
                if let (Some(a), false) = (aspect, slot.aspect_set) {
                    cfg.aspect = a;
                }
                if let (Some(w), false) = (width, slot.width_set) {
                    cfg.angular_width = w;
                }
            }
            _ if FOREIGN_KEYS.contains(&key) => {
                debug!("ignoring setting {}", key);
            }
            _ => {
                return Err(ParseError::UnknownKey {
                    key: key.to_string(),
                    src: ctx.named_source(),
                    span: key_span,
                    suggestion: closest_key(key).map(|k| format!("did you mean `{k}`?")),
                });
            }
        }
        Ok(())
    }
}

/// The known key closest to `key`, if any is close enough to be a typo
fn closest_key(key: &str) -> Option<&'static str> {
    KEYS.iter()
        .map(|k| (edit_distance(key, k), *k))
        .filter(|(d, k)| *d <= 2.max(k.len() / 4))
        .min_by_key(|(d, _)| *d)
        .map(|(_, k)| k)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}
