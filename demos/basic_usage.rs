//! Ejemplo básico de uso del simulador de planificación de CPU

use cpu_scheduler_simulator::{Process, Simulation, SimulationConfig, Workload};

fn main() {
    println!("=== Ejemplo: Uso Básico del Simulador ===\n");

    let workload = Workload::new(vec![
        Process::new("P1", 0.0, 8.0, 2),
        Process::new("P2", 1.0, 4.0, 0),
        Process::new("P3", 2.0, 9.0, 1),
        Process::new("P4", 3.0, 5.0, 1),
        Process::new("P5", 20.0, 2.0, 0),
    ])
    .expect("La carga de trabajo de ejemplo es válida");

    let simulation = Simulation::new(SimulationConfig::default().with_quantum(3.0))
        .expect("La configuración de ejemplo es válida");

    let mut results = Vec::new();
    for run in simulation.run(&workload) {
        match run.outcome {
            Ok((schedule, metrics)) => {
                println!("--- {} ---", run.algorithm.description());
                println!("{}\n", schedule.timeline);
                results.push(metrics);
            }
            Err(e) => println!("--- {} falló: {} ---\n", run.algorithm, e),
        }
    }

    println!(
        "{}",
        simulation
            .metrics_calculator()
            .generate_comparison_table("ejemplo", &results)
    );
}
