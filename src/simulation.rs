//! # Módulo de Simulación Principal
//!
//! Este módulo contiene el orquestador: corre los seis algoritmos sobre una
//! misma carga de trabajo, calcula las métricas de cada plan y, para un caso
//! leído de archivo, escribe un reporte por algoritmo.
//!
//! Cada algoritmo corre en su propio hilo sobre su propio estado; el fallo
//! de uno no interrumpe a los demás.

use std::path::{Path, PathBuf};
use std::thread;

use log::{info, warn};

use crate::config::SimulationConfig;
use crate::engine::{self, Schedule};
use crate::error::{Result, SimulationError};
use crate::input;
use crate::metrics::{MetricsCalculator, SchedulingMetrics};
use crate::process::Workload;
use crate::report::{self, ReportFormat};
use crate::scheduler::SchedulingAlgorithm;

/// Resultado de un algoritmo dentro de una corrida.
#[derive(Debug)]
pub struct AlgorithmRun {
    pub algorithm: SchedulingAlgorithm,
    pub outcome: Result<(Schedule, SchedulingMetrics)>,
}

/// Resumen de un caso procesado desde archivo.
#[derive(Debug)]
pub struct CaseSummary {
    /// Nombre del caso (nombre del archivo sin extensión)
    pub case: String,
    /// Métricas de los algoritmos que terminaron bien, en orden de reporte
    pub metrics: Vec<SchedulingMetrics>,
    /// Reportes escritos
    pub written: Vec<PathBuf>,
    /// Algoritmos que fallaron y su error
    pub failures: Vec<(SchedulingAlgorithm, SimulationError)>,
}

impl CaseSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orquestador de la simulación.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::{Process, Simulation, SimulationConfig, Workload};
///
/// let workload = Workload::new(vec![
///     Process::new("A", 0.0, 5.0, 1),
///     Process::new("B", 0.0, 5.0, 0),
/// ]).unwrap();
///
/// let simulation = Simulation::new(SimulationConfig::default()).unwrap();
/// let runs = simulation.run(&workload);
/// assert_eq!(runs.len(), 6);
/// assert!(runs.iter().all(|run| run.outcome.is_ok()));
/// ```
pub struct Simulation {
    config: SimulationConfig,
    metrics_calculator: MetricsCalculator,
}

impl Simulation {
    /// Crea un orquestador con la configuración indicada.
    ///
    /// # Arguments
    ///
    /// * `config` - Parámetros compartidos por los seis algoritmos
    ///
    /// # Returns
    ///
    /// El orquestador, con su calculadora de métricas ya configurada
    ///
    /// # Errors
    ///
    /// `InvalidConfig` si el quantum o el costo de cambio de contexto están
    /// fuera de rango.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let metrics_calculator = MetricsCalculator::new(config.throughput_horizons.clone());
        Ok(Self {
            config,
            metrics_calculator,
        })
    }

    /// Configuración con la que corren los motores.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn metrics_calculator(&self) -> &MetricsCalculator {
        &self.metrics_calculator
    }

    /// Los seis algoritmos con el quantum configurado.
    pub fn algorithms(&self) -> [SchedulingAlgorithm; 6] {
        SchedulingAlgorithm::all(self.config.quantum)
    }

    /// Ejecuta un algoritmo y calcula sus métricas.
    ///
    /// # Arguments
    ///
    /// * `workload` - Carga de trabajo validada
    /// * `algorithm` - Algoritmo a simular
    ///
    /// # Returns
    ///
    /// El plan del motor junto con sus métricas
    pub fn run_algorithm(
        &self,
        workload: &Workload,
        algorithm: SchedulingAlgorithm,
    ) -> Result<(Schedule, SchedulingMetrics)> {
        let schedule = engine::simulate(workload, algorithm, &self.config);
        let metrics = self.metrics_calculator.calculate(workload, &schedule)?;
        Ok((schedule, metrics))
    }

    /// Ejecuta los seis algoritmos en paralelo.
    ///
    /// # Arguments
    ///
    /// * `workload` - Carga de trabajo compartida, solo de lectura
    ///
    /// # Returns
    ///
    /// Un `AlgorithmRun` por algoritmo, en orden de reporte. Un hilo que
    /// entra en pánico queda como `WorkerPanicked` en su propio resultado.
    pub fn run(&self, workload: &Workload) -> Vec<AlgorithmRun> {
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .algorithms()
                .into_iter()
                .map(|algorithm| {
                    let handle = scope.spawn(move || self.run_algorithm(workload, algorithm));
                    (algorithm, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(algorithm, handle)| {
                    let outcome = handle.join().unwrap_or_else(|_| {
                        Err(SimulationError::WorkerPanicked {
                            algorithm: algorithm.label().to_string(),
                        })
                    });
                    AlgorithmRun { algorithm, outcome }
                })
                .collect()
        })
    }

    /// Lee un caso, corre los seis algoritmos y escribe un reporte por cada
    /// uno que termine bien.
    ///
    /// # Arguments
    ///
    /// * `input_path` - Archivo de procesos; su nombre sin extensión es el caso
    /// * `out_dir` - Directorio de salida de los reportes
    /// * `format` - Formato de los reportes
    ///
    /// # Errors
    ///
    /// Solo falla si el caso no se puede leer; los fallos por algoritmo
    /// quedan en `CaseSummary::failures`.
    pub fn run_case(
        &self,
        input_path: &Path,
        out_dir: &Path,
        format: ReportFormat,
    ) -> Result<CaseSummary> {
        let case = report::case_name(input_path);
        let workload = input::read_processes(input_path)?;
        info!(
            "Caso {}: {} procesos, ráfaga total {}",
            case,
            workload.len(),
            workload.total_burst()
        );

        let mut summary = CaseSummary {
            case,
            metrics: Vec::new(),
            written: Vec::new(),
            failures: Vec::new(),
        };

        for run in self.run(&workload) {
            let written = run.outcome.and_then(|(schedule, metrics)| {
                let path = report::write_report(
                    out_dir,
                    &summary.case,
                    &self.metrics_calculator,
                    &metrics,
                    &schedule,
                    format,
                )?;
                Ok((path, metrics))
            });

            match written {
                Ok((path, metrics)) => {
                    info!(
                        "{} {}: espera promedio {:.3}, eficiencia {:.2}%",
                        summary.case,
                        run.algorithm.label(),
                        metrics.avg_waiting,
                        metrics.cpu_efficiency_percent
                    );
                    summary.written.push(path);
                    summary.metrics.push(metrics);
                }
                Err(error) => {
                    warn!("{} {}: {}", summary.case, run.algorithm.label(), error);
                    summary.failures.push((run.algorithm, error));
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Process;

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::default().with_quantum(-1.0);
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));

        let config = SimulationConfig::default().with_context_switch_cost(f64::NAN);
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_runs_follow_report_order() {
        let workload = Workload::new(vec![Process::new("A", 0.0, 3.0, 1)]).unwrap();
        let simulation = Simulation::new(SimulationConfig::default().with_quantum(2.0)).unwrap();

        let labels: Vec<&str> = simulation
            .run(&workload)
            .iter()
            .map(|run| run.algorithm.label())
            .collect();
        assert_eq!(
            labels,
            vec!["FCFS", "SJF_NONPRE", "SJF_PRE", "RR", "PRIO_NONPRE", "PRIO_PRE"]
        );
        assert_eq!(simulation.algorithms()[3].quantum(), Some(2.0));
        assert_eq!(simulation.config().quantum, 2.0);
    }

    #[test]
    fn test_empty_workload_fails_every_algorithm_independently() {
        let workload = Workload::new(Vec::new()).unwrap();
        let simulation = Simulation::new(SimulationConfig::default()).unwrap();

        let runs = simulation.run(&workload);
        assert_eq!(runs.len(), 6);
        assert!(runs
            .iter()
            .all(|run| matches!(run.outcome, Err(SimulationError::EmptyWorkload))));
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let workload = Workload::new(vec![
            Process::new("A", 0.0, 7.0, 2),
            Process::new("B", 1.0, 2.0, 0),
            Process::new("C", 3.0, 4.0, 1),
        ])
        .unwrap();
        let simulation = Simulation::new(SimulationConfig::default()).unwrap();

        for run in simulation.run(&workload) {
            let (_, parallel) = run.outcome.unwrap();
            let (_, sequential) = simulation.run_algorithm(&workload, run.algorithm).unwrap();
            assert_eq!(parallel, sequential);
        }
    }
}
