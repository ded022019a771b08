//! # Módulo de Errores
//!
//! Errores que puede producir el simulador, desde la lectura de la carga de
//! trabajo hasta la escritura de los reportes.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errores del simulador de planificación.
#[derive(Debug)]
pub enum SimulationError {
    /// Se pidieron métricas agregadas sobre un conjunto vacío de procesos.
    EmptyWorkload,
    /// El planificador no registró la finalización de un proceso.
    MissingCompletion {
        /// Identificador del proceso sin tiempo de finalización
        id: String,
    },
    /// Dos registros comparten el mismo identificador.
    DuplicateProcess {
        /// Identificador repetido
        id: String,
    },
    /// Un registro viola las invariantes de `Process`.
    InvalidProcess {
        /// Identificador del registro inválido
        id: String,
        /// Motivo del rechazo
        reason: String,
    },
    /// Parámetros de configuración fuera de rango.
    InvalidConfig(String),
    /// El hilo de un algoritmo terminó con pánico.
    WorkerPanicked {
        /// Etiqueta del algoritmo
        algorithm: String,
    },
    /// Fila de entrada mal formada.
    Parse {
        /// Línea (1-indexada) del archivo de entrada
        line: usize,
        /// Descripción del problema
        message: String,
    },
    /// Fallo de entrada/salida al leer procesos o escribir reportes.
    Io {
        /// Ruta involucrada
        path: PathBuf,
        /// Error original
        source: io::Error,
    },
}

impl SimulationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWorkload => {
                write!(f, "No hay procesos: las métricas agregadas no están definidas")
            }
            Self::MissingCompletion { id } => {
                write!(f, "El proceso {} no tiene tiempo de finalización", id)
            }
            Self::DuplicateProcess { id } => {
                write!(f, "Identificador de proceso duplicado: {}", id)
            }
            Self::InvalidProcess { id, reason } => {
                write!(f, "Proceso inválido {}: {}", id, reason)
            }
            Self::InvalidConfig(message) => write!(f, "Configuración inválida: {}", message),
            Self::WorkerPanicked { algorithm } => {
                write!(f, "El hilo de {} terminó con pánico", algorithm)
            }
            Self::Parse { line, message } => write!(f, "Línea {}: {}", line, message),
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resultado con el error del simulador.
pub type Result<T> = std::result::Result<T, SimulationError>;
