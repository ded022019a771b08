//! # Módulo de Métricas y Reportes
//!
//! Este módulo deriva las métricas de rendimiento de un plan: tiempos de
//! espera y turnaround por proceso, promedios y máximos, throughput en
//! horizontes fijos y eficiencia de CPU. También genera el reporte
//! `clave: valor` y la tabla comparativa entre algoritmos.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::engine::Schedule;
use crate::error::{Result, SimulationError};
use crate::process::{Process, Time, Workload};

/// Métricas individuales de un proceso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub id: String,
    pub arrival: Time,
    pub burst: Time,
    pub completion: Time,
    /// `completion - arrival`
    pub turnaround: Time,
    /// `turnaround - burst`
    pub waiting: Time,
}

/// Procesos terminados hasta un horizonte de tiempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    pub horizon: u32,
    pub completed: usize,
}

/// Métricas agregadas de un algoritmo sobre una carga de trabajo.
///
/// Los agregados se toman sobre el conjunto completo de procesos, por eso
/// nunca se calculan para una carga vacía.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingMetrics {
    /// Etiqueta del algoritmo (`FCFS`, `RR`, ...)
    pub algorithm: String,
    /// Si el algoritmo puede interrumpir al proceso en ejecución
    pub preemptive: bool,
    /// Métricas de cada proceso, en el orden de la carga
    pub processes: Vec<ProcessMetrics>,
    pub context_switches: u64,
    /// Reloj final, redondeado a 6 decimales
    pub total_time: Time,
    pub avg_waiting: Time,
    pub max_waiting: Time,
    pub avg_turnaround: Time,
    pub max_turnaround: Time,
    /// Un valor por horizonte configurado, en el mismo orden
    pub throughput: Vec<Throughput>,
    /// Porcentaje del tiempo total con un proceso en CPU
    pub cpu_efficiency_percent: f64,
}

/// Calculadora de métricas.
///
/// No guarda estado entre cálculos: el resultado depende solo del plan, la
/// carga y los horizontes de throughput.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    horizons: Vec<u32>,
}

impl MetricsCalculator {
    /// Crea una calculadora con los horizontes de throughput indicados.
    ///
    /// # Arguments
    ///
    /// * `horizons` - Instantes en los que se cuentan los procesos terminados,
    ///   en el orden en que aparecen en el reporte
    pub fn new(horizons: Vec<u32>) -> Self {
        Self { horizons }
    }

    /// Horizontes de throughput configurados.
    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    /// Calcula las métricas de un proceso a partir de su finalización.
    ///
    /// # Arguments
    ///
    /// * `process` - Proceso de la carga
    /// * `schedule` - Plan producido por un motor
    ///
    /// # Returns
    ///
    /// Turnaround `completion - arrival` y espera `turnaround - burst`
    ///
    /// # Errors
    ///
    /// `MissingCompletion` si el plan no registra la finalización del proceso.
    pub fn calculate_process_metrics(
        &self,
        process: &Process,
        schedule: &Schedule,
    ) -> Result<ProcessMetrics> {
        let completion =
            schedule
                .completion(&process.id)
                .ok_or_else(|| SimulationError::MissingCompletion {
                    id: process.id.clone(),
                })?;
        let turnaround = completion - process.arrival;

        Ok(ProcessMetrics {
            id: process.id.clone(),
            arrival: process.arrival,
            burst: process.burst,
            completion,
            turnaround,
            waiting: turnaround - process.burst,
        })
    }

    /// Calcula las métricas agregadas de un plan.
    ///
    /// # Arguments
    ///
    /// * `workload` - Carga de trabajo simulada
    /// * `schedule` - Plan que produjo el motor para esa carga
    ///
    /// # Returns
    ///
    /// Las métricas por proceso y los agregados del algoritmo
    ///
    /// # Errors
    ///
    /// `EmptyWorkload` si no hay procesos (promedio y máximo no están
    /// definidos) y `MissingCompletion` si falta alguna finalización.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::{engine, MetricsCalculator, Process, SchedulingAlgorithm,
    ///     SimulationConfig, Workload};
    ///
    /// let workload = Workload::new(vec![
    ///     Process::new("A", 0.0, 5.0, 1),
    ///     Process::new("B", 2.0, 3.0, 1),
    /// ]).unwrap();
    /// let config = SimulationConfig::default().with_context_switch_cost(0.0);
    /// let schedule = engine::simulate(&workload, SchedulingAlgorithm::Fcfs, &config);
    ///
    /// let metrics = MetricsCalculator::new(vec![5, 10])
    ///     .calculate(&workload, &schedule)
    ///     .unwrap();
    /// assert_eq!(metrics.avg_waiting, 1.5);
    /// assert_eq!(metrics.max_turnaround, 6.0);
    /// assert_eq!(metrics.cpu_efficiency_percent, 100.0);
    /// ```
    pub fn calculate(
        &self,
        workload: &Workload,
        schedule: &Schedule,
    ) -> Result<SchedulingMetrics> {
        if workload.is_empty() {
            return Err(SimulationError::EmptyWorkload);
        }

        let processes = workload
            .processes()
            .iter()
            .map(|p| self.calculate_process_metrics(p, schedule))
            .collect::<Result<Vec<_>>>()?;

        let count = processes.len() as f64;
        let avg_waiting = processes.iter().map(|m| m.waiting).sum::<Time>() / count;
        let avg_turnaround = processes.iter().map(|m| m.turnaround).sum::<Time>() / count;
        let max_waiting = Self::max(processes.iter().map(|m| m.waiting));
        let max_turnaround = Self::max(processes.iter().map(|m| m.turnaround));

        let throughput = self
            .horizons
            .iter()
            .map(|&horizon| Throughput {
                horizon,
                completed: schedule
                    .completions
                    .values()
                    .filter(|&&completion| completion <= f64::from(horizon))
                    .count(),
            })
            .collect();

        let total = schedule.total_time;
        let cpu_efficiency_percent = if total > 0.0 {
            schedule.timeline.busy_time() / total * 100.0
        } else {
            0.0
        };

        Ok(SchedulingMetrics {
            algorithm: schedule.algorithm.label().to_string(),
            preemptive: schedule.algorithm.is_preemptive(),
            processes,
            context_switches: schedule.context_switches,
            total_time: (total * 1e6).round() / 1e6,
            avg_waiting,
            max_waiting,
            avg_turnaround,
            max_turnaround,
            throughput,
            cpu_efficiency_percent,
        })
    }

    fn max(values: impl Iterator<Item = Time>) -> Time {
        values.fold(f64::NEG_INFINITY, f64::max)
    }

    /// Genera el reporte `clave: valor`, una métrica por línea.
    ///
    /// # Arguments
    ///
    /// * `metrics` - Métricas de un algoritmo
    ///
    /// # Returns
    ///
    /// El contenido del archivo de métricas, terminado en salto de línea
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::MetricsCalculator;
    /// use cpu_scheduler_simulator::metrics::{SchedulingMetrics, Throughput};
    ///
    /// let metrics = SchedulingMetrics {
    ///     algorithm: "FCFS".to_string(),
    ///     preemptive: false,
    ///     processes: Vec::new(),
    ///     context_switches: 2,
    ///     total_time: 8.0,
    ///     avg_waiting: 1.5,
    ///     max_waiting: 3.0,
    ///     avg_turnaround: 5.0,
    ///     max_turnaround: 6.0,
    ///     throughput: vec![Throughput { horizon: 50, completed: 2 }],
    ///     cpu_efficiency_percent: 100.0,
    /// };
    /// let report = MetricsCalculator::new(vec![50]).generate_report(&metrics);
    /// assert!(report.starts_with("context_switches: 2\ntotal_time: 8.0\n"));
    /// assert!(report.contains("throughput_T_50: 2\n"));
    /// ```
    pub fn generate_report(&self, metrics: &SchedulingMetrics) -> String {
        let mut report = String::new();
        let mut line = |key: &str, value: String| {
            let _ = writeln!(report, "{}: {}", key, value);
        };

        line("context_switches", metrics.context_switches.to_string());
        line("total_time", Self::format_value(metrics.total_time));
        line("avg_waiting", Self::format_value(metrics.avg_waiting));
        line("max_waiting", Self::format_value(metrics.max_waiting));
        line("avg_turnaround", Self::format_value(metrics.avg_turnaround));
        line("max_turnaround", Self::format_value(metrics.max_turnaround));
        for throughput in &metrics.throughput {
            line(
                &format!("throughput_T_{}", throughput.horizon),
                throughput.completed.to_string(),
            );
        }
        line(
            "cpu_efficiency_percent",
            Self::format_value(metrics.cpu_efficiency_percent),
        );

        report
    }

    /// Genera una tabla comparativa con una fila por algoritmo.
    ///
    /// La columna de throughput corresponde al último horizonte configurado.
    ///
    /// # Arguments
    ///
    /// * `case` - Nombre del caso, usado como título
    /// * `results` - Métricas de cada algoritmo, en orden de reporte
    ///
    /// # Returns
    ///
    /// Un `String` con la tabla lista para imprimir
    pub fn generate_comparison_table(
        &self,
        case: &str,
        results: &[SchedulingMetrics],
    ) -> String {
        let mut table = String::new();
        let horizon = self.horizons().last().copied();
        let throughput_header = horizon
            .map(|h| format!("T<={}", h))
            .unwrap_or_else(|| "T".to_string());

        let _ = writeln!(table, "\n{:=^92}", format!("  {}  ", case));
        let _ = writeln!(
            table,
            "{:<12} {:>6} {:>6} {:>10} {:>12} {:>12} {:>8} {:>14}",
            "Algoritmo",
            "Expr.",
            "Ctx",
            "Espera",
            "Turnaround",
            "Total",
            throughput_header,
            "Eficiencia %"
        );
        let _ = writeln!(table, "{:-<92}", "");

        for metrics in results {
            let completed = horizon
                .and_then(|h| metrics.throughput.iter().find(|t| t.horizon == h))
                .map(|t| t.completed.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                table,
                "{:<12} {:>6} {:>6} {:>10.3} {:>12.3} {:>12.3} {:>8} {:>14.2}",
                metrics.algorithm,
                if metrics.preemptive { "sí" } else { "no" },
                metrics.context_switches,
                metrics.avg_waiting,
                metrics.avg_turnaround,
                metrics.total_time,
                completed,
                metrics.cpu_efficiency_percent
            );
        }

        table
    }

    /// Formatea un valor real con la representación más corta que lo
    /// identifica, conservando siempre la parte decimal (`8.0`, `2.5`).
    pub fn format_value(value: f64) -> String {
        format!("{:?}", value)
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_THROUGHPUT_HORIZONS.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::engine;
    use crate::scheduler::SchedulingAlgorithm;

    fn fcfs_schedule(workload: &Workload) -> Schedule {
        let config = SimulationConfig::default().with_context_switch_cost(0.0);
        engine::simulate(workload, SchedulingAlgorithm::Fcfs, &config)
    }

    #[test]
    fn test_waiting_and_turnaround() {
        let workload = Workload::new(vec![
            Process::new("A", 0.0, 5.0, 1),
            Process::new("B", 2.0, 3.0, 1),
        ])
        .unwrap();
        let schedule = fcfs_schedule(&workload);
        let metrics = MetricsCalculator::default().calculate(&workload, &schedule).unwrap();

        let waits: Vec<f64> = metrics.processes.iter().map(|m| m.waiting).collect();
        // B: (8 - 2) - 3
        assert_eq!(waits, vec![0.0, 3.0]);
        assert_eq!(metrics.avg_turnaround, 5.5);
        assert_eq!(metrics.max_waiting, 3.0);
        assert_eq!(metrics.context_switches, 2);
    }

    #[test]
    fn test_throughput_horizons() {
        let workload = Workload::new(vec![
            Process::new("A", 0.0, 4.0, 1),
            Process::new("B", 0.0, 4.0, 1),
            Process::new("C", 0.0, 4.0, 1),
        ])
        .unwrap();
        let schedule = fcfs_schedule(&workload);
        let metrics = MetricsCalculator::new(vec![4, 7, 12])
            .calculate(&workload, &schedule)
            .unwrap();

        let completed: Vec<usize> = metrics.throughput.iter().map(|t| t.completed).collect();
        assert_eq!(completed, vec![1, 1, 3]);
    }

    #[test]
    fn test_efficiency_excludes_idle_time() {
        let workload = Workload::new(vec![
            Process::new("A", 0.0, 2.0, 1),
            Process::new("B", 6.0, 2.0, 1),
        ])
        .unwrap();
        let schedule = fcfs_schedule(&workload);
        let metrics = MetricsCalculator::default().calculate(&workload, &schedule).unwrap();

        assert_eq!(schedule.total_time, 8.0);
        assert_eq!(metrics.cpu_efficiency_percent, 50.0);
    }

    #[test]
    fn test_empty_workload_fails_explicitly() {
        let workload = Workload::new(Vec::new()).unwrap();
        let schedule = fcfs_schedule(&workload);
        let result = MetricsCalculator::default().calculate(&workload, &schedule);
        assert!(matches!(result, Err(SimulationError::EmptyWorkload)));
    }

    #[test]
    fn test_missing_completion_is_reported() {
        let workload = Workload::new(vec![Process::new("A", 0.0, 1.0, 1)]).unwrap();
        let mut schedule = fcfs_schedule(&workload);
        schedule.completions.clear();

        let result = MetricsCalculator::default().calculate(&workload, &schedule);
        assert!(matches!(result, Err(SimulationError::MissingCompletion { id }) if id == "A"));
    }

    #[test]
    fn test_report_lines_in_order() {
        let workload = Workload::new(vec![Process::new("A", 0.0, 2.0, 1)]).unwrap();
        let schedule = fcfs_schedule(&workload);
        let calculator = MetricsCalculator::default();
        let metrics = calculator.calculate(&workload, &schedule).unwrap();
        let report = calculator.generate_report(&metrics);

        let keys: Vec<&str> = report
            .lines()
            .map(|l| l.split(": ").next().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec![
                "context_switches",
                "total_time",
                "avg_waiting",
                "max_waiting",
                "avg_turnaround",
                "max_turnaround",
                "throughput_T_50",
                "throughput_T_100",
                "throughput_T_150",
                "throughput_T_200",
                "cpu_efficiency_percent",
            ]
        );
        assert!(report.contains("avg_turnaround: 2.0\n"));
    }

    #[test]
    fn test_comparison_table_marks_preemption_and_last_horizon() {
        let workload = Workload::new(vec![
            Process::new("A", 0.0, 4.0, 1),
            Process::new("B", 1.0, 2.0, 1),
        ])
        .unwrap();
        let config = SimulationConfig::default().with_context_switch_cost(0.0);
        let calculator = MetricsCalculator::new(vec![3, 6]);
        let algorithms = [SchedulingAlgorithm::Fcfs, SchedulingAlgorithm::SjfPreemptive];
        let results: Vec<SchedulingMetrics> = algorithms
            .into_iter()
            .map(|algorithm| {
                let schedule = engine::simulate(&workload, algorithm, &config);
                calculator.calculate(&workload, &schedule).unwrap()
            })
            .collect();

        assert!(!results[0].preemptive);
        assert!(results[1].preemptive);

        let table = calculator.generate_comparison_table("demo", &results);
        assert!(table.contains("T<=6"));
        let fcfs_row = table.lines().find(|l| l.starts_with("FCFS")).unwrap();
        let srtf_row = table.lines().find(|l| l.starts_with("SJF_PRE")).unwrap();
        assert_eq!(fcfs_row.split_whitespace().nth(1), Some("no"));
        assert_eq!(srtf_row.split_whitespace().nth(1), Some("sí"));
        assert_eq!(fcfs_row.split_whitespace().nth(6), Some("2"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(MetricsCalculator::format_value(8.0), "8.0");
        assert_eq!(MetricsCalculator::format_value(2.5), "2.5");
        assert_eq!(MetricsCalculator::format_value(0.001), "0.001");
    }

    #[test]
    fn test_total_time_is_rounded() {
        let workload = Workload::new(vec![Process::new("A", 0.0, 1.0, 1)]).unwrap();
        let config = SimulationConfig::default().with_context_switch_cost(1.0 / 3.0);
        let schedule = engine::simulate(&workload, SchedulingAlgorithm::Fcfs, &config);
        let metrics = MetricsCalculator::default().calculate(&workload, &schedule).unwrap();

        assert_eq!(metrics.total_time, 1.333333);
    }
}
