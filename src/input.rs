//! # Módulo de Entrada
//!
//! Lectura de procesos desde texto separado por comas:
//!
//! ```text
//! process_id,arrival_time,cpu_burst_time,priority
//! P1,0,5,high
//! P2,2,3,1
//! ```
//!
//! La fila de encabezado es opcional, las líneas vacías se ignoran y la
//! prioridad admite niveles textuales, enteros, reales o una celda vacía.

use std::fs;
use std::path::Path;

use log::debug;

use crate::config::{BLANK_PRIORITY, FALLBACK_PRIORITY};
use crate::error::{Result, SimulationError};
use crate::process::{Process, Workload};

/// Nombres de columna que delatan una fila de encabezado.
const HEADER_NAMES: [&str; 7] = [
    "process_id",
    "pid",
    "arrival_time",
    "arrival",
    "cpu_burst_time",
    "burst",
    "priority",
];

/// Normaliza el texto de una prioridad a su rango entero.
///
/// - vacío: `BLANK_PRIORITY`
/// - entero (con signo opcional): ese valor
/// - `high` / `normal` / `low` (sin importar mayúsculas): 0 / 1 / 2
/// - real: truncado hacia cero
/// - cualquier otra cosa: `FALLBACK_PRIORITY`
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::input::parse_priority;
///
/// assert_eq!(parse_priority("HIGH"), 0);
/// assert_eq!(parse_priority("-3"), -3);
/// assert_eq!(parse_priority("2.9"), 2);
/// assert_eq!(parse_priority(""), 0);
/// assert_eq!(parse_priority("urgent"), 1);
/// ```
pub fn parse_priority(text: &str) -> i32 {
    let text = text.trim();
    if text.is_empty() {
        return BLANK_PRIORITY;
    }
    if let Ok(value) = text.parse::<i32>() {
        return value;
    }

    match text.to_lowercase().as_str() {
        "high" => 0,
        "normal" => 1,
        "low" => 2,
        other => match other.parse::<f64>() {
            Ok(value) if value.is_finite() => value.trunc() as i32,
            _ => FALLBACK_PRIORITY,
        },
    }
}

fn is_header(cells: &[&str]) -> bool {
    cells
        .iter()
        .any(|cell| HEADER_NAMES.contains(&cell.to_lowercase().as_str()))
}

fn parse_time(cell: Option<&&str>, field: &str, line: usize) -> Result<f64> {
    let cell = cell.ok_or_else(|| SimulationError::Parse {
        line,
        message: format!("falta el campo {}", field),
    })?;
    cell.parse::<f64>().map_err(|_| SimulationError::Parse {
        line,
        message: format!("valor inválido para {}: {:?}", field, cell),
    })
}

/// Interpreta el contenido completo de una entrada y construye la carga de
/// trabajo ordenada por `(llegada, id)`.
///
/// # Arguments
///
/// * `text` - Filas `id, llegada, ráfaga[, prioridad]`, con encabezado opcional
///
/// # Returns
///
/// La `Workload` validada
///
/// # Errors
///
/// `Parse` con el número de línea si falta un campo obligatorio o un tiempo
/// no es numérico; los errores de validación de `Workload::new` en otro caso.
pub fn parse_processes(text: &str) -> Result<Workload> {
    let rows: Vec<(usize, Vec<&str>)> = text
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.split(',').map(str::trim).collect::<Vec<_>>()))
        .filter(|(_, cells)| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    let skip = match rows.first() {
        Some((_, cells)) if is_header(cells) => 1,
        _ => 0,
    };

    let mut processes = Vec::with_capacity(rows.len().saturating_sub(skip));
    for (line, cells) in &rows[skip..] {
        let id = cells[0];
        if id.is_empty() {
            return Err(SimulationError::Parse {
                line: *line,
                message: "falta el identificador del proceso".to_string(),
            });
        }
        let arrival = parse_time(cells.get(1), "arrival", *line)?;
        let burst = parse_time(cells.get(2), "burst", *line)?;
        let priority = cells.get(3).map_or(BLANK_PRIORITY, |cell| parse_priority(cell));

        processes.push(Process::new(id, arrival, burst, priority));
    }

    debug!("{} procesos leídos", processes.len());
    Workload::new(processes)
}

/// Lee y valida los procesos de un archivo.
///
/// # Errors
///
/// `Io` si el archivo no se puede leer, y los mismos errores que
/// `parse_processes` para su contenido.
pub fn read_processes(path: impl AsRef<Path>) -> Result<Workload> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SimulationError::io(path, e))?;
    parse_processes(&text)
}
