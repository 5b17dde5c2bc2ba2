use gemlab::shapes::GeoKind;
use klshell::prelude::*;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "klshell_run",
    about = "Runs an incremental Kirchhoff-Love shell inflation simulation"
)]
struct Options {
    /// Geometry preset: "sphere" or "plate"
    #[structopt(long, default_value = "sphere")]
    geometry: String,

    /// Cell kind: "qua4" or "qua16"
    #[structopt(long, default_value = "qua4")]
    kind: String,

    /// Material model: "neo-hookean" or "mooney-rivlin"
    #[structopt(long, default_value = "neo-hookean")]
    material: String,

    /// Number of cells per direction
    #[structopt(long, default_value = "8")]
    ndiv: usize,

    /// Sphere radius (or plate side length)
    #[structopt(long, default_value = "10.0")]
    size: f64,

    /// Number of load increments
    #[structopt(long, default_value = "200")]
    n_increments: usize,

    /// Radial displacement increment per step
    #[structopt(long, default_value = "0.4")]
    delta_radius: f64,

    /// Output directory for VTU files and the summary
    #[structopt(long, default_value = "/tmp/klshell/results")]
    out_dir: String,

    /// Disables the VTU output
    #[structopt(long)]
    no_vtu: bool,

    /// Suppresses progress messages
    #[structopt(long)]
    quiet: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // mesh
    let kind = match options.kind.as_str() {
        "qua4" => GeoKind::Qua4,
        "qua16" => GeoKind::Qua16,
        _ => return Err("kind must be qua4 or qua16"),
    };
    let mesh = match options.geometry.as_str() {
        "sphere" => SampleMeshes::quarter_sphere(kind, options.size, options.ndiv, options.ndiv)?,
        "plate" => SampleMeshes::flat_shell(kind, options.ndiv, options.ndiv, options.size, options.size)?,
        _ => return Err("geometry must be sphere or plate"),
    };

    // parameters
    let param = match options.material.as_str() {
        "neo-hookean" => SampleParams::param_shell_neo_hookean(),
        "mooney-rivlin" => SampleParams::param_shell_mooney_rivlin(),
        _ => return Err("material must be neo-hookean or mooney-rivlin"),
    };

    // configuration
    let mut config = Config::new();
    config
        .set_n_increments(options.n_increments)?
        .set_delta_radius(options.delta_radius)?
        .set_out_dir(&options.out_dir)?
        .set_write_vtu(!options.no_vtu)?
        .set_verbose(!options.quiet)?;
    if !options.quiet {
        println!("{}", config);
    }

    // run simulation
    let mut solver = ShellSolver::new(&mesh, &config, param)?;
    let summary = solver.run()?;

    // message
    if let Some(last) = summary.steps.last() {
        println!(
            "done: {} increments, final stretch range = [{:.4}, {:.4}]",
            last.istep, last.stretch_min, last.stretch_max
        );
    }
    Ok(())
}
