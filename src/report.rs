//! # Módulo de Reportes
//!
//! Escritura de un archivo de métricas por cada par (caso, algoritmo) en un
//! directorio de salida, que se crea si no existe.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;
use serde::Serialize;

use crate::engine::Schedule;
use crate::error::{Result, SimulationError};
use crate::metrics::{MetricsCalculator, SchedulingMetrics};

/// Formato de los archivos de métricas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Líneas `clave: valor`
    #[default]
    Text,
    /// JSON con métricas, filas por proceso y el plan completo
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    case: &'a str,
    metrics: &'a SchedulingMetrics,
    schedule: &'a Schedule,
}

/// Crea el directorio de salida (y sus padres) si no existe.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| SimulationError::io(dir, e))
}

/// Ruta del reporte de un algoritmo: `<dir>/<caso>_<ALGORITMO>_metrics.<ext>`.
///
/// # Arguments
///
/// * `dir` - Directorio de salida
/// * `case` - Nombre del caso
/// * `label` - Etiqueta del algoritmo
/// * `format` - Formato del reporte, que fija la extensión
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use cpu_scheduler_simulator::report::{report_path, ReportFormat};
///
/// let path = report_path(Path::new("out"), "case1", "SJF_PRE", ReportFormat::Text);
/// assert_eq!(path, Path::new("out/case1_SJF_PRE_metrics.txt"));
/// ```
pub fn report_path(dir: &Path, case: &str, label: &str, format: ReportFormat) -> PathBuf {
    dir.join(format!("{}_{}_metrics.{}", case, label, format.extension()))
}

/// Escribe el reporte de métricas de un algoritmo.
///
/// # Arguments
///
/// * `dir` - Directorio de salida, se crea si no existe
/// * `case` - Nombre del caso
/// * `calculator` - Calculadora que da formato al reporte de texto
/// * `metrics` - Métricas del algoritmo
/// * `schedule` - Plan del algoritmo; solo el formato JSON lo incluye
/// * `format` - Formato del reporte
///
/// # Returns
///
/// La ruta del archivo escrito
///
/// # Errors
///
/// `Io` si no se puede crear el directorio o escribir el archivo.
pub fn write_report(
    dir: &Path,
    case: &str,
    calculator: &MetricsCalculator,
    metrics: &SchedulingMetrics,
    schedule: &Schedule,
    format: ReportFormat,
) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = report_path(dir, case, &metrics.algorithm, format);

    let contents = match format {
        ReportFormat::Text => calculator.generate_report(metrics),
        ReportFormat::Json => {
            let report = JsonReport {
                case,
                metrics,
                schedule,
            };
            serde_json::to_string_pretty(&report).map_err(|e| {
                SimulationError::io(&path, std::io::Error::new(std::io::ErrorKind::Other, e))
            })?
        }
    };

    fs::write(&path, contents).map_err(|e| SimulationError::io(&path, e))?;
    info!("Reporte escrito: {}", path.display());
    Ok(path)
}

/// Nombre del caso: el nombre del archivo de entrada sin extensión.
pub fn case_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "case".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::engine;
    use crate::metrics::Throughput;
    use crate::process::{Process, Workload};
    use crate::scheduler::SchedulingAlgorithm;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cpu-scheduler-simulator-{}-{}",
            name,
            std::process::id()
        ))
    }

    fn sample_metrics() -> SchedulingMetrics {
        SchedulingMetrics {
            algorithm: "RR".to_string(),
            preemptive: true,
            processes: Vec::new(),
            context_switches: 4,
            total_time: 10.0,
            avg_waiting: 4.0,
            max_waiting: 4.0,
            avg_turnaround: 9.5,
            max_turnaround: 10.0,
            throughput: vec![Throughput {
                horizon: 50,
                completed: 2,
            }],
            cpu_efficiency_percent: 100.0,
        }
    }

    fn sample_schedule() -> Schedule {
        let workload = Workload::new(vec![
            Process::new("A", 0.0, 5.0, 1),
            Process::new("B", 0.0, 5.0, 1),
        ])
        .unwrap();
        let config = SimulationConfig::default().with_context_switch_cost(0.0);
        engine::simulate(&workload, SchedulingAlgorithm::round_robin(4.0), &config)
    }

    #[test]
    fn test_case_name_uses_file_stem() {
        assert_eq!(case_name(Path::new("data/case_3.csv")), "case_3");
        assert_eq!(case_name(Path::new("plain")), "plain");
    }

    #[test]
    fn test_write_text_report_creates_directory() {
        let dir = scratch_dir("text").join("nested");
        let calculator = MetricsCalculator::new(vec![50]);

        let path = write_report(
            &dir,
            "demo",
            &calculator,
            &sample_metrics(),
            &sample_schedule(),
            ReportFormat::Text,
        )
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "demo_RR_metrics.txt");
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("context_switches: 4\n"));
        assert!(contents.contains("throughput_T_50: 2\n"));

        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn test_write_json_report() {
        let dir = scratch_dir("json");
        let calculator = MetricsCalculator::new(vec![50]);

        let path = write_report(
            &dir,
            "demo",
            &calculator,
            &sample_metrics(),
            &sample_schedule(),
            ReportFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["case"], "demo");
        assert_eq!(value["metrics"]["context_switches"], 4);
        assert_eq!(value["metrics"]["preemptive"], true);
        assert_eq!(value["schedule"]["completions"]["B"], 10.0);
        assert_eq!(value["schedule"]["context_switches"], 4);
        assert_eq!(
            value["schedule"]["timeline"]["segments"]
                .as_array()
                .map(Vec::len),
            Some(4)
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
