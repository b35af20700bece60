use miette::Diagnostic;
use starcharter::coords::CoordinateSystem;
use starcharter::{Chart, ChartFileError, ParseError, ProjectionKind, parse_charts};

const CHARTS: &str = "\
# Constellation charts
DEFAULTS
width = 20
output_dpi = 200
star_col = 0.9,0.9,1

CHART
title = Orion
ra_central = 5.5
dec_central = 2

CHART
projection = peters
coords = galactic

DEFAULTS
font_size = 1.5

CHART
projection = stereographic
angular_width = 120
";

#[test]
fn reads_every_chart() {
    let charts = parse_charts("charts.sch", CHARTS).unwrap();
    assert_eq!(charts.len(), 3);

    assert_eq!(charts[0].title.as_deref(), Some("Orion"));
    assert_eq!(charts[0].width, 20.0);
    assert_eq!(charts[0].dpi, 200.0);

    assert_eq!(charts[1].projection, ProjectionKind::Cylindrical);
    assert_eq!(charts[1].coords, CoordinateSystem::Galactic);
    assert_eq!(charts[1].angular_width, 360.0);
    assert_eq!(charts[1].font_size, 1.0);

    assert_eq!(charts[2].projection, ProjectionKind::Spherical);
    assert_eq!(charts[2].font_size, 1.5);
    assert_eq!(charts[2].title, None);
}

#[test]
fn every_chart_builds() {
    for config in parse_charts("charts.sch", CHARTS).unwrap() {
        let chart = Chart::new(&config).unwrap();
        let size = chart.canvas().canvas_size();
        let cm = 200.0 / 2.54;
        assert!((size.w.0 - (20.0 + 3.2) * cm).abs() < 1e-9);
    }
}

#[test]
fn title_moves_the_plot_down() {
    let charts = parse_charts("charts.sch", CHARTS).unwrap();
    let titled = Chart::new(&charts[0]).unwrap();
    let plain = Chart::new(&charts[2]).unwrap();
    let cm = 200.0 / 2.54;
    assert!((titled.canvas().plot_rect().min.y.0 - 1.4 * cm).abs() < 1e-9);
    assert!((plain.canvas().plot_rect().min.y.0 - 0.7 * cm).abs() < 1e-9);
}

#[test]
fn errors_carry_codes_and_spans() {
    let err = parse_charts("bad.sch", "CHART\nprojection = mercator\n").unwrap_err();
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("starcharter::parse::invalid_choice"));
    assert_eq!(err.to_string(), "invalid value for `projection`: mercator");
    match err {
        ChartFileError::Parse(ParseError::InvalidChoice { span, .. }) => {
            assert_eq!(span.offset(), 19);
            assert_eq!(span.len(), 8);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn validation_errors_name_the_chart() {
    let err = parse_charts("bad.sch", "CHART\nCHART\ncoords = alt_az\n").unwrap_err();
    assert_eq!(err.to_string(), "chart #2 is invalid");
    let cause = std::error::Error::source(&err).map(|e| e.to_string());
    assert_eq!(
        cause.as_deref(),
        Some("the alt/az coordinate system requires an observer location and time")
    );
}

#[test]
fn crlf_files_read_the_same() {
    let unix = parse_charts("a.sch", CHARTS).unwrap();
    let dos = parse_charts("b.sch", &CHARTS.replace('\n', "\r\n")).unwrap();
    assert_eq!(unix, dos);
}
