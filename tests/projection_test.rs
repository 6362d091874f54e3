//! Projection Integration Tests
//!
//! End-to-end checks of the four linked views: limit convergence through
//! the wiring graph, orientation handling, style merging, data projection
//! and the three output paths.
//!
//! Run: cargo test --test projection_test

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use approx::assert_relative_eq;
use orthoproj_viz::artist::Primitive;
use orthoproj_viz::config::OutputConfig;
use orthoproj_viz::output::PngEncoder;
use orthoproj_viz::prelude::*;
use orthoproj_viz::style::merge;
use proptest::prelude::*;
use std::io::Cursor;

fn proj() -> OrthoProj {
    OrthoProj::new(Some("Integration")).expect("default figure should be creatable")
}

/// Every (view, dim) pair that exists on the standard layout.
fn view_dims() -> Vec<(ViewId, Dim)> {
    let mut pairs = Vec::new();
    for view in ViewId::ALL {
        for &dim in view.kind().dims() {
            pairs.push((view, dim));
        }
    }
    pairs
}

fn points(n: usize) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let x = (0..n).map(|i| i as f32).collect();
    let y = (0..n).map(|i| i as f32 * 10.0 + 1.0).collect();
    let z = (0..n).map(|i| -(i as f32) * 100.0 - 2.0).collect();
    (x, y, z)
}

// ============================================================================
// CONVERGENCE
// After a notifying set, every wired target shows the same interval, keeps
// its own orientation, is written exactly once and never re-emits.
// ============================================================================

proptest! {
    #[test]
    fn prop_set_lim_converges(
        pair in 0usize..9,
        low in -1.0e3f32..1.0e3,
        high in -1.0e3f32..1.0e3,
    ) {
        let mut proj = proj();
        let (view, dim) = view_dims()[pair];
        let targets = proj.wiring().targets_of(view, dim);

        let orientation: Vec<bool> = targets
            .iter()
            .map(|&(t, d)| proj.lim(t, d).unwrap().is_inverted())
            .collect();
        let emitted: Vec<usize> = ViewId::ALL.iter().map(|&v| proj.axes(v).emitted()).collect();
        let silent: Vec<usize> = targets
            .iter()
            .map(|&(t, d)| proj.axes(t).silent_sets(d))
            .collect();

        let limits = Limits::new(low, high);
        let moved = proj.set_lim(view, dim, limits).unwrap();
        prop_assert_eq!(&moved.updated, &targets);
        prop_assert_eq!(proj.lim(view, dim).unwrap(), limits);

        for (i, &(target, target_dim)) in targets.iter().enumerate() {
            let got = proj.lim(target, target_dim).unwrap();
            prop_assert_eq!(got.min(), limits.min());
            prop_assert_eq!(got.max(), limits.max());
            if low != high {
                prop_assert_eq!(got.is_inverted(), orientation[i]);
            }
            prop_assert_eq!(proj.axes(target).silent_sets(target_dim), silent[i] + 1);
        }

        for (i, &v) in ViewId::ALL.iter().enumerate() {
            let expected = emitted[i] + usize::from(v == view);
            prop_assert_eq!(proj.axes(v).emitted(), expected);
        }
    }

    #[test]
    fn prop_inverted_input_keeps_target_orientation(
        low in -50.0f32..0.0,
        high in 0.1f32..50.0,
    ) {
        let mut proj = proj();
        proj.set_lim(ViewId::Xy, Dim::Y, Limits::new(high, low)).unwrap();

        // YZ(X) is inverted, 3D(Y) is not; both follow XY(Y).
        prop_assert_eq!(proj.lim(ViewId::Yz, Dim::X).unwrap(), Limits::new(high, low));
        prop_assert_eq!(proj.lim(ViewId::ThreeD, Dim::Y).unwrap(), Limits::new(low, high));
    }

    #[test]
    fn prop_plot_projects_every_length(n in 1usize..64) {
        let mut proj = proj();
        let (x, y, z) = points(n);
        proj.plot(&x, &y, &z, &PlotStyles::new()).unwrap();

        for view in ViewId::PLANAR {
            let (h, v) = view.planar_data(&x, &y, &z).unwrap();
            let Primitive::Line(drawn) = proj.axes(view).artists()[0].primitive() else {
                panic!("{view} should hold a line");
            };
            prop_assert_eq!(drawn.len(), n);
            for (i, p) in drawn.iter().enumerate() {
                prop_assert_eq!((p.x, p.y), (h[i], v[i]));
            }
        }
        let Primitive::Line3(drawn) = proj.axes(ViewId::ThreeD).artists()[0].primitive() else {
            panic!("3D should hold a line");
        };
        prop_assert_eq!(drawn.len(), n);
        prop_assert_eq!((drawn[n - 1].x, drawn[n - 1].y, drawn[n - 1].z), (x[n - 1], y[n - 1], z[n - 1]));
    }
}

#[test]
fn test_degenerate_range_propagates_unchanged() {
    let mut proj = proj();
    let moved = proj
        .set_lim(ViewId::Xz, Dim::X, Limits::new(5.0, 5.0))
        .expect("zero-width range is valid");

    assert_eq!(moved.updated, vec![(ViewId::Xy, Dim::X), (ViewId::ThreeD, Dim::X)]);
    assert_eq!(proj.lim(ViewId::Xy, Dim::X).unwrap(), Limits::new(5.0, 5.0));
    assert_eq!(proj.lim(ViewId::ThreeD, Dim::X).unwrap(), Limits::new(5.0, 5.0));

    // The degenerate range still renders.
    assert!(proj.to_framebuffer().is_ok());
}

#[test]
fn test_non_finite_range_is_rejected_before_propagation() {
    let mut proj = proj();
    let before: Vec<Limits> = view_dims().iter().map(|&(v, d)| proj.lim(v, d).unwrap()).collect();
    let emitted: Vec<usize> = ViewId::ALL.iter().map(|&v| proj.axes(v).emitted()).collect();

    for (view, dim) in view_dims() {
        for bad in [Limits::new(f32::NAN, 1.0), Limits::new(0.0, f32::INFINITY)] {
            assert!(matches!(
                proj.set_lim(view, dim, bad),
                Err(Error::InvalidLimits { .. })
            ));
        }
    }

    let after: Vec<Limits> = view_dims().iter().map(|&(v, d)| proj.lim(v, d).unwrap()).collect();
    assert_eq!(after, before);
    let emitted_after: Vec<usize> = ViewId::ALL.iter().map(|&v| proj.axes(v).emitted()).collect();
    assert_eq!(emitted_after, emitted);
}

#[test]
fn test_zoom_past_data_still_renders() {
    let mut proj = proj();
    let x = [0.0, 1e4, -1e4, 5e3];
    let y = [0.0, -1e4, 1e4, 2.0];
    let z = [0.0, 1e4, 3.0, -1e4];
    let labelled = PlotStyles::new().shared(StyleOptions::new().with("label", "far"));
    proj.scatter(&x, &y, &z, &labelled).unwrap();
    proj.plot(&x, &y, &z, &PlotStyles::new()).unwrap();
    proj.plot_collection(&x, &y, &z, &PlotStyles::new()).unwrap();

    // Every dimension zoomed onto a sliver that holds at most the origin.
    proj.set_lim(ViewId::Xy, Dim::X, Limits::new(0.0, 1e-3)).unwrap();
    proj.set_lim(ViewId::Xy, Dim::Y, Limits::new(0.0, 1e-3)).unwrap();
    proj.set_lim(ViewId::Xz, Dim::Y, Limits::new(-1e-3, 0.0)).unwrap();

    let fb = proj.to_framebuffer().expect("zoomed figure should rasterize");
    assert_eq!((fb.width(), fb.height()), (800, 800));
    let svg = proj.to_svg().expect("zoomed figure should render as SVG");
    assert!(svg.contains(">far</text>"));

    // Zooming onto empty space works as well.
    proj.set_lim(ViewId::ThreeD, Dim::X, Limits::new(7e3, 7.001e3)).unwrap();
    assert!(proj.to_framebuffer().is_ok());
}

#[test]
fn test_extreme_style_sizes_render() {
    let mut proj = proj();
    let (x, y, z) = points(5);
    let huge = |key: &str| PlotStyles::new().shared(StyleOptions::new().with(key, 1e10));
    proj.scatter(&x, &y, &z, &huge("ms")).unwrap();
    proj.scatter(&x, &y, &z, &huge("s")).unwrap();
    proj.plot(&x, &y, &z, &huge("lw")).unwrap();
    let grid = Grid::from_fn(&[0.0, 1.0, 2.0], &[0.0, 1.0], |x, y| x * y).unwrap();
    proj.plot_wireframe(&grid, &huge("linewidth")).unwrap();

    let fb = proj.to_framebuffer().expect("oversized strokes should rasterize");
    // Strokes and markers stay inside their panels.
    assert_eq!(fb.get_pixel(2, 2), Some(Rgba::WHITE));
    assert!(proj.to_svg().is_ok());

    proj.set_lim(ViewId::Xy, Dim::X, Limits::new(100.0, 100.001)).unwrap();
    assert!(proj.to_framebuffer().is_ok());
}

#[test]
fn test_three_d_z_drives_both_vertical_axes() {
    let mut proj = proj();
    proj.set_lim(ViewId::ThreeD, Dim::Z, Limits::new(-3.0, 9.0)).unwrap();

    assert_eq!(proj.lim(ViewId::Xz, Dim::Y).unwrap(), Limits::new(-3.0, 9.0));
    assert_eq!(proj.lim(ViewId::Yz, Dim::Y).unwrap(), Limits::new(-3.0, 9.0));
    assert_ne!(proj.lim(ViewId::Xy, Dim::Y).unwrap(), Limits::new(-3.0, 9.0));
}

// ============================================================================
// YZ INVERSION
// ============================================================================

#[test]
fn test_yz_inversion_survives_autoscale_and_sync() {
    let mut proj = proj();
    assert!(proj.lim(ViewId::Yz, Dim::X).unwrap().is_inverted());

    let (x, y, z) = points(8);
    proj.scatter(&x, &y, &z, &PlotStyles::new()).unwrap();
    let after_plot = proj.lim(ViewId::Yz, Dim::X).unwrap();
    assert!(after_plot.is_inverted());
    assert_relative_eq!(after_plot.max(), 71.0 + 70.0 * 0.05, epsilon = 1e-3);

    proj.set_lim(ViewId::ThreeD, Dim::Y, Limits::new(0.0, 10.0)).unwrap();
    assert_eq!(proj.lim(ViewId::Yz, Dim::X).unwrap(), Limits::new(10.0, 0.0));
}

// ============================================================================
// STYLES
// ============================================================================

#[test]
fn test_merge_precedence() {
    let shared = StyleOptions::new().with("color", "k").with("alpha", 0.5);
    let xz = StyleOptions::new().with("color", "r");
    let merged = merge(&[Some(&shared), Some(&xz)]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("color"), Some(&StyleValue::from("r")));
    assert_eq!(merged.get("alpha"), Some(&StyleValue::from(0.5)));

    let styles = PlotStyles::new().shared(shared).view(ViewId::Xz, xz);
    assert_eq!(styles.for_view(ViewId::Xz), merged);
    assert_eq!(styles.for_view(ViewId::Xy).get("color"), Some(&StyleValue::from("k")));
}

#[test]
fn test_per_view_color_reaches_artist() {
    let mut proj = proj();
    let styles = PlotStyles::new()
        .shared(StyleOptions::new().with("color", "k"))
        .view(ViewId::Xz, StyleOptions::new().with("color", "r"));
    proj.plot(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0], &styles).unwrap();

    assert_eq!(proj.axes(ViewId::Xz).artists()[0].color(), Rgba::parse("r").unwrap());
    assert_eq!(proj.axes(ViewId::Yz).artists()[0].color(), Rgba::parse("k").unwrap());
}

#[test]
fn test_unknown_style_key_draws_nothing() {
    let mut proj = proj();
    let styles = PlotStyles::new().view(ViewId::ThreeD, StyleOptions::new().with("glow", true));
    let err = proj.plot(&[0.0], &[0.0], &[0.0], &styles).unwrap_err();

    assert!(matches!(err, Error::InvalidStyle { .. }));
    for view in ViewId::ALL {
        assert!(proj.axes(view).artists().is_empty());
    }
}

// ============================================================================
// UNSUPPORTED AND INVALID INPUT
// ============================================================================

#[test]
fn test_trisurf_is_not_implemented() {
    let mut proj = proj();
    let (x, y, z) = points(4);

    for (x, y, z) in [(&x[..], &y[..], &z[..]), (&[][..], &[][..], &[][..])] {
        let err = proj.plot_trisurf(x, y, z, &PlotStyles::new()).unwrap_err();
        assert!(matches!(err, Error::NotImplemented("plot_trisurf")));
        assert_eq!(err.to_string(), "plot_trisurf: Not Implemented Yet");
    }
}

#[test]
fn test_length_mismatch_rejected() {
    let mut proj = proj();
    let err = proj
        .scatter(&[0.0, 1.0], &[0.0], &[0.0, 1.0], &PlotStyles::new())
        .unwrap_err();

    assert!(matches!(err, Error::DataLengthMismatch { x_len: 2, y_len: 1, z_len: 2 }));
}

#[test]
fn test_surface_fills_all_views() {
    let mut proj = proj();
    let xs: Vec<f32> = (0..6).map(|i| i as f32 - 2.5).collect();
    let grid = Grid::from_fn(&xs, &xs, |x, y| x * x - y * y).unwrap();
    proj.plot_surface(&grid, &PlotStyles::new()).unwrap();

    for view in ViewId::PLANAR {
        assert_eq!(proj.axes(view).artists().len(), 2);
    }
    assert!(matches!(
        proj.axes(ViewId::ThreeD).artists()[0].primitive(),
        Primitive::Surface(_)
    ));
    let z = proj.lim(ViewId::ThreeD, Dim::Z).unwrap();
    assert!(z.min() < -6.0 && z.max() > 6.0);
}

// ============================================================================
// OUTPUTS
// ============================================================================

fn helix() -> OrthoProj {
    let mut proj = proj();
    let t: Vec<f32> = (0..120).map(|i| i as f32 * 0.1).collect();
    let x: Vec<f32> = t.iter().map(|t| t.cos()).collect();
    let y: Vec<f32> = t.iter().map(|t| t.sin()).collect();
    proj.plot(&x, &y, &t, &PlotStyles::new()).unwrap();
    proj
}

#[test]
fn test_png_export() {
    let proj = helix();
    let bytes = PngEncoder::to_bytes(&proj.to_framebuffer().unwrap()).unwrap();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("helix.png");
    proj.save_png(&path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 8);
}

#[test]
fn test_svg_export_carries_titles() {
    let proj = helix();
    let svg = proj.to_svg().unwrap();

    for view in ViewId::ALL {
        assert!(svg.contains(view.title()), "missing {}", view.title());
    }
    assert!(svg.contains("Integration"));
    assert!(svg.contains("X axis"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("helix.svg");
    proj.save_svg(&path).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("<svg"));
}

#[test]
fn test_terminal_output() {
    let mut config = FigureConfig::with_title("Terminal");
    config.output = OutputConfig {
        kind: OutputKind::Terminal,
        terminal: TerminalStyle::Ascii,
        columns: 40,
        ..OutputConfig::default()
    };
    let proj = OrthoProj::with_config(config).unwrap();
    let text = proj.render_terminal().unwrap();

    assert!(text.lines().all(|line| line.chars().count() == 40));
    assert!(text.chars().any(|c| !c.is_whitespace()));
}

#[test]
fn test_blocking_show_reads_ack() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shown.svg");
    let mut config = FigureConfig::default();
    config.output = OutputConfig {
        kind: OutputKind::Svg,
        path: Some(path.clone()),
        ..OutputConfig::default()
    };
    let proj = OrthoProj::with_config(config).unwrap();

    proj.show_with_input(true, Cursor::new("\n")).unwrap();
    assert!(path.exists());
    proj.close();
}

#[test]
fn test_config_driven_projection() {
    let yaml = "title: From YAML\nwidth: 400\nheight: 400\nmargin: 20\n";
    let config = FigureConfig::parse(yaml).unwrap();
    let mut proj = OrthoProj::with_config(config).unwrap();

    assert_eq!(proj.figure().width(), 400);
    proj.set_dimensions(60, 60);
    assert!(matches!(proj.to_framebuffer(), Err(Error::InvalidDimensions { .. })));
}
