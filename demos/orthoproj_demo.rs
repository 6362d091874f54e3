//! Orthogonal projection demo: the same scenes seen from four linked views.
//!
//! Writes `orthoproj_example.png` (checkered ellipsoid, colormapped spiral,
//! helix and a cube whose faces stack by `zorder`), `orthoproj_wireframe.svg`
//! and prints a terminal rendering of the zoomed helix. Set
//! `RUST_LOG=orthoproj_viz=debug` to watch limit propagation.
//!
//! Run: cargo run --example orthoproj_demo

use orthoproj_viz::config::OutputConfig;
use orthoproj_viz::prelude::*;
use std::f32::consts::PI;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    example()?;
    wireframe()?;
    zoomed_helix()?;
    Ok(())
}

type Cloud = (Vec<f32>, Vec<f32>, Vec<f32>);

fn unzip3(points: impl Iterator<Item = (f32, f32, f32)>) -> Cloud {
    points.fold((Vec::new(), Vec::new(), Vec::new()), |(mut xs, mut ys, mut zs), (x, y, z)| {
        xs.push(x);
        ys.push(y);
        zs.push(z);
        (xs, ys, zs)
    })
}

fn linspace(start: f32, end: f32, n: usize) -> impl Iterator<Item = f32> {
    let step = (end - start) / (n - 1) as f32;
    (0..n).map(move |i| start + i as f32 * step)
}

/// Unit sphere sampled on a 40 x 20 (u, v) grid.
fn ellipsoid() -> Result<Grid> {
    let u: Vec<f32> = linspace(0.0, 2.0 * PI, 40).collect();
    let v: Vec<f32> = linspace(0.0, PI, 20).collect();
    let rows = |f: &dyn Fn(f32, f32) -> f32| -> Vec<Vec<f32>> {
        u.iter().map(|&u| v.iter().map(|&v| f(u, v)).collect()).collect()
    };
    Grid::new(
        rows(&|u, v| u.cos() * v.sin()),
        rows(&|u, v| u.sin() * v.sin()),
        rows(&|_, v| v.cos()),
    )
}

/// Archimedes' spiral `r = -5 + 0.1 theta^2`.
fn spiral() -> Cloud {
    unzip3(linspace(-4.0 * PI, 4.0 * PI, 1000).map(|theta| {
        let r = -5.0 + 0.1 * theta * theta;
        ((r * theta.sin() + 0.5) / 10.0, (r * theta.cos() - 10.0) / 5.0, theta / 12.0)
    }))
}

fn helix(radius: f32, lift: f32) -> Cloud {
    unzip3(linspace(0.0, 10.0 * PI, 1000).map(|t| {
        (radius * t.sin(), radius * t.cos(), t / (20.0 * PI) + lift)
    }))
}

/// The six faces of an axis-aligned cube, four corners each.
fn cube(edge: f32, offset: (f32, f32, f32)) -> Vec<Cloud> {
    const X: [[f32; 4]; 6] = [
        [0., 1., 1., 0.], [0., 1., 1., 0.], [0., 0., 0., 0.],
        [0., 0., 1., 1.], [1., 1., 0., 0.], [1., 1., 1., 1.],
    ];
    const Y: [[f32; 4]; 6] = [
        [0., 0., 1., 1.], [0., 0., 1., 1.], [0., 0., 1., 1.],
        [0., 0., 0., 0.], [1., 1., 1., 1.], [1., 1., 0., 0.],
    ];
    const Z: [[f32; 4]; 6] = [
        [0., 0., 0., 0.], [1., 1., 1., 1.], [1., 0., 0., 1.],
        [1., 0., 0., 1.], [1., 0., 0., 1.], [1., 0., 0., 1.],
    ];
    let scale = |face: &[f32; 4], by: f32| -> Vec<f32> { face.iter().map(|v| v * edge + by).collect() };
    (0..6)
        .map(|i| (scale(&X[i], offset.0), scale(&Y[i], offset.1), scale(&Z[i], offset.2)))
        .collect()
}

fn min(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::INFINITY, f32::min)
}

fn max(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Surface, scatter, line and collection in one projection.
fn example() -> Result<()> {
    let mut proj = OrthoProj::new(Some("Example"))?;

    let sphere = ellipsoid()?;
    let palette = ["y", "b", "g", "r"];
    let checker: Vec<&str> = (0..sphere.rows())
        .flat_map(|r| (0..sphere.cols()).map(move |c| palette[(r + c) % palette.len()]))
        .collect();
    let surface = PlotStyles::new()
        .shared(StyleOptions::new().with("color", "k"))
        .view(
            ViewId::ThreeD,
            StyleOptions::new()
                .with("alpha", 0.25)
                .with("rstride", 1)
                .with("cstride", 1)
                .with("facecolors", checker),
        );
    proj.plot_surface(&sphere, &surface)?;

    let (x, y, z) = spiral();
    let colormapped = PlotStyles::new().shared(
        StyleOptions::new()
            .with("alpha", 0.9)
            .with("c", z.as_slice())
            .with("cmap", "jet")
            .with("lw", 0)
            .with("label", "spiral"),
    );
    proj.scatter(&x, &y, &z, &colormapped)?;

    let (x, y, z) = helix(0.25, 1.0);
    let line = PlotStyles::new().shared(
        StyleOptions::new()
            .with("linewidth", 2)
            .with("alpha", 0.9)
            .with("color", "r")
            .with("label", "helix"),
    );
    proj.plot(&x, &y, &z, &line)?;

    // Faces nearer the viewer of each plane stack on top.
    let faces = cube(0.5, (-0.25, -0.25, 0.25));
    let count = faces.len() as f32;
    for (i, (x, y, z)) in faces.iter().enumerate() {
        let styles = PlotStyles::new()
            .shared(StyleOptions::new().with("facecolor", Colormap::Jet.at(i as f32 / count).to_hex()))
            .view(ViewId::Xz, StyleOptions::new().with("zorder", -min(y)))
            .view(ViewId::Yz, StyleOptions::new().with("zorder", -min(x)))
            .view(ViewId::Xy, StyleOptions::new().with("zorder", max(z)));
        proj.plot_collection(x, y, z, &styles)?;
    }

    proj.save_png("orthoproj_example.png")?;
    proj.close();
    Ok(())
}

/// Rotated ripple surface as a black wireframe.
fn wireframe() -> Result<()> {
    let mut proj = OrthoProj::new(Some("Wireframe"))?;

    let base: Vec<f32> = (0..50).map(|i| -5.0 + i as f32 * 0.2).collect();
    let angle = -15.0f32.to_radians();
    let rows = |f: &dyn Fn(f32, f32) -> f32| -> Vec<Vec<f32>> {
        base.iter().map(|&y| base.iter().map(|&x| f(x, y)).collect()).collect()
    };
    let grid = Grid::new(
        rows(&|x, y| x * angle.cos() - y * angle.sin()),
        rows(&|x, y| x * angle.sin() + y * angle.cos()),
        rows(&|x, y| {
            let r = 2.0 * (x * x + y * y).sqrt();
            r.sin() / r.sqrt() - (x / 10.0).powi(2)
        }),
    )?;

    let styles = PlotStyles::new()
        .shared(StyleOptions::new().with("color", "k"))
        .view(ViewId::ThreeD, StyleOptions::new().with("rstride", 1).with("cstride", 1));
    proj.plot_wireframe(&grid, &styles)?;

    proj.save_svg("orthoproj_wireframe.svg")?;
    proj.close();
    Ok(())
}

/// Helix zoomed from the horizontal plane, rendered in the terminal.
fn zoomed_helix() -> Result<()> {
    let mut config = FigureConfig::with_title("Helix");
    config.width = 480;
    config.height = 480;
    config.margin = 24;
    config.output = OutputConfig {
        kind: OutputKind::Terminal,
        terminal: TerminalStyle::Ascii,
        columns: 96,
        ..OutputConfig::default()
    };
    let mut proj = OrthoProj::with_config(config)?;

    let (x, y, z) = helix(1.0, 0.0);
    proj.plot(&x, &y, &z, &PlotStyles::new().shared(StyleOptions::new().with("lw", 2)))?;

    let zoom = proj.set_lim(ViewId::Xy, Dim::X, Limits::new(-0.5, 0.5))?;
    println!("zoom on XY x updated {:?}", zoom.updated);

    proj.show(false)?;
    proj.close();
    Ok(())
}
