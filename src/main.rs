use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};

use cpu_scheduler_simulator::config::{
    DEFAULT_CONTEXT_SWITCH_COST, DEFAULT_QUANTUM, DEFAULT_THROUGHPUT_HORIZONS,
};
use cpu_scheduler_simulator::{ReportFormat, Simulation, SimulationConfig};

/// Simula los seis algoritmos de planificación de CPU sobre cada archivo de
/// procesos y escribe un reporte de métricas por algoritmo.
#[derive(Parser, Debug)]
#[command(name = "cpu-scheduler-simulator")]
#[command(about = "Compara algoritmos de planificación de CPU", long_about = None)]
struct Args {
    /// Archivos de procesos (id, llegada, ráfaga, prioridad)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directorio de salida de los reportes
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Quantum de Round Robin
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM)]
    quantum: f64,

    /// Costo de cada cambio de contexto
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONTEXT_SWITCH_COST)]
    context_switch: f64,

    /// Horizontes de throughput separados por comas
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_THROUGHPUT_HORIZONS)]
    horizons: Vec<u32>,

    /// Formato de los reportes
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Muestra cada decisión de despacho
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let config = SimulationConfig::default()
        .with_quantum(args.quantum)
        .with_context_switch_cost(args.context_switch)
        .with_throughput_horizons(args.horizons);

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = simulation.config();
    info!(
        "Quantum {}, cambio de contexto {}, horizontes {:?}",
        config.quantum, config.context_switch_cost, config.throughput_horizons
    );

    let mut all_ok = true;
    for input in &args.inputs {
        match simulation.run_case(input, &args.out, args.format) {
            Ok(summary) => {
                println!(
                    "{}",
                    simulation
                        .metrics_calculator()
                        .generate_comparison_table(&summary.case, &summary.metrics)
                );
                all_ok &= summary.is_success();
            }
            Err(e) => {
                error!("{}: {}", input.display(), e);
                all_ok = false;
            }
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
