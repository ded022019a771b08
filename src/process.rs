//! # Módulo de Procesos
//!
//! Este módulo define el registro inmutable de un proceso simulado y la
//! carga de trabajo (`Workload`) que agrupa los procesos de un caso ya
//! validados y ordenados por `(llegada, id)`.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Tiempo simulado. No tiene relación con el reloj real.
pub type Time = f64;

/// Describe una unidad de trabajo simulada.
///
/// Un `Process` se crea una sola vez a partir de la entrada y nunca se
/// modifica: el trabajo restante lo lleva cada motor por separado.
///
/// Menor valor de `priority` significa mayor prioridad (0 = alta,
/// 1 = normal, 2 = baja por convención).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// Identificador único del proceso
    pub id: String,
    /// Instante en que el proceso pasa a estar listo
    pub arrival: Time,
    /// Tiempo total de CPU requerido
    pub burst: Time,
    /// Rango de prioridad (menor = más prioritario)
    pub priority: i32,
}

impl Process {
    /// Crea un nuevo proceso.
    ///
    /// # Arguments
    ///
    /// * `id` - Identificador único dentro del caso
    /// * `arrival` - Instante de llegada
    /// * `burst` - Tiempo de CPU requerido
    /// * `priority` - Rango de prioridad, menor es más prioritario
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::Process;
    ///
    /// let p = Process::new("P1", 0.0, 5.0, 1);
    /// assert_eq!(p.id, "P1");
    /// assert_eq!(p.burst, 5.0);
    /// ```
    pub fn new(id: impl Into<String>, arrival: Time, burst: Time, priority: i32) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            priority,
        }
    }

    /// Verifica las invariantes del registro: id no vacío, llegada y ráfaga
    /// finitas y no negativas.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| SimulationError::InvalidProcess {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("el identificador está vacío"));
        }
        if !self.arrival.is_finite() || self.arrival < 0.0 {
            return Err(invalid("la llegada debe ser finita y >= 0"));
        }
        if !self.burst.is_finite() || self.burst < 0.0 {
            return Err(invalid("la ráfaga debe ser finita y >= 0"));
        }
        Ok(())
    }
}

// Orden natural usado como desempate en las colas ordenadas: id, luego
// llegada, ráfaga y prioridad. Es total aun con campos `f64` gracias a
// `total_cmp`.
impl Ord for Process {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.arrival.total_cmp(&other.arrival))
            .then_with(|| self.burst.total_cmp(&other.burst))
            .then_with(|| self.priority.cmp(&other.priority))
    }
}

impl PartialOrd for Process {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Process {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Process {}

/// Conjunto de procesos de un caso, validado y ordenado por `(llegada, id)`.
///
/// Es la única forma en que los motores reciben procesos, de modo que el
/// orden de admisión y la unicidad de los identificadores están garantizados.
#[derive(Debug, Clone, Default)]
pub struct Workload {
    processes: Vec<Process>,
}

impl Workload {
    /// Valida y ordena los procesos.
    ///
    /// # Arguments
    ///
    /// * `processes` - Registros en cualquier orden
    ///
    /// # Returns
    ///
    /// La carga ordenada por `(llegada, id)`
    ///
    /// # Errors
    ///
    /// `InvalidProcess` si algún registro viola sus invariantes y
    /// `DuplicateProcess` si dos registros comparten identificador.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::{Process, Workload};
    ///
    /// let workload = Workload::new(vec![
    ///     Process::new("B", 2.0, 3.0, 1),
    ///     Process::new("A", 0.0, 5.0, 1),
    /// ]).unwrap();
    /// assert_eq!(workload.processes()[0].id, "A");
    /// ```
    pub fn new(mut processes: Vec<Process>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(processes.len());
        for process in &processes {
            process.validate()?;
            if !seen.insert(process.id.as_str()) {
                return Err(SimulationError::DuplicateProcess {
                    id: process.id.clone(),
                });
            }
        }

        processes.sort_by(|a, b| {
            a.arrival
                .total_cmp(&b.arrival)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Self { processes })
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Suma de las ráfagas de todos los procesos.
    pub fn total_burst(&self) -> Time {
        self.processes.iter().map(|p| p.burst).sum()
    }
}
