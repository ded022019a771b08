//! # Módulo de Algoritmos de Planificación
//!
//! Este módulo enumera los seis algoritmos de scheduling que soporta el
//! simulador y describe, para cada uno, las tres decisiones que el motor
//! necesita: cómo se ordena la cola de listos, cuánto dura cada despacho y
//! qué hacer cuando la CPU no tiene procesos listos.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::process::Time;

/// Algoritmos de planificación disponibles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SchedulingAlgorithm {
    /// First-Come First-Served: no preemptivo, en orden de llegada.
    Fcfs,

    /// Shortest-Job-First no preemptivo: se elige la ráfaga más corta y se
    /// ejecuta hasta completarla.
    SjfNonPreemptive,

    /// Shortest-Remaining-Time-First: en cada paso unitario se ejecuta el
    /// proceso con menor tiempo restante.
    SjfPreemptive,

    /// Round Robin: cola FIFO con quantum fijo.
    RoundRobin {
        /// Tiempo máximo de ejecución continua por despacho
        quantum: Time,
    },

    /// Prioridad no preemptiva (menor valor = mayor prioridad).
    PriorityNonPreemptive,

    /// Prioridad preemptiva en pasos unitarios.
    PriorityPreemptive,
}

/// Criterio de orden de la cola de listos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    /// Orden de admisión
    Fifo,
    /// Menor tiempo restante primero
    ShortestRemaining,
    /// Menor valor de prioridad primero
    HighestPriority,
}

/// Política cuando no hay ningún proceso listo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdlePolicy {
    /// Saltar directamente a la próxima llegada
    JumpToArrival,
    /// Avanzar el reloj un paso fijo y volver a intentar
    Step(Time),
}

impl SchedulingAlgorithm {
    /// Crea un Round Robin con el quantum indicado.
    ///
    /// # Arguments
    ///
    /// * `quantum` - Tiempo máximo de CPU por despacho
    ///
    /// # Returns
    ///
    /// Una instancia de `SchedulingAlgorithm::RoundRobin`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::SchedulingAlgorithm;
    ///
    /// let rr = SchedulingAlgorithm::round_robin(4.0);
    /// assert_eq!(rr.quantum(), Some(4.0));
    /// ```
    pub fn round_robin(quantum: Time) -> Self {
        Self::RoundRobin { quantum }
    }

    /// Los seis algoritmos en el orden en que se ejecutan y reportan.
    pub fn all(quantum: Time) -> [Self; 6] {
        [
            Self::Fcfs,
            Self::SjfNonPreemptive,
            Self::SjfPreemptive,
            Self::round_robin(quantum),
            Self::PriorityNonPreemptive,
            Self::PriorityPreemptive,
        ]
    }

    /// Determina si el algoritmo puede interrumpir a un proceso en ejecución.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::SchedulingAlgorithm;
    ///
    /// assert!(!SchedulingAlgorithm::Fcfs.is_preemptive());
    /// assert!(SchedulingAlgorithm::round_robin(4.0).is_preemptive());
    /// ```
    pub fn is_preemptive(&self) -> bool {
        !matches!(
            self,
            Self::Fcfs | Self::SjfNonPreemptive | Self::PriorityNonPreemptive
        )
    }

    /// Indica si el algoritmo avanza en pasos unitarios, reevaluando la cola
    /// en cada paso y manteniendo abierto el segmento del proceso en curso.
    pub fn is_stepwise(&self) -> bool {
        matches!(self, Self::SjfPreemptive | Self::PriorityPreemptive)
    }

    pub fn discipline(&self) -> Discipline {
        match self {
            Self::Fcfs | Self::RoundRobin { .. } => Discipline::Fifo,
            Self::SjfNonPreemptive | Self::SjfPreemptive => Discipline::ShortestRemaining,
            Self::PriorityNonPreemptive | Self::PriorityPreemptive => Discipline::HighestPriority,
        }
    }

    /// FCFS salta a la siguiente llegada; el resto espera activamente un
    /// paso de `IDLE_STEP` cada vez.
    pub fn idle_policy(&self) -> IdlePolicy {
        match self {
            Self::Fcfs => IdlePolicy::JumpToArrival,
            _ => IdlePolicy::Step(config::IDLE_STEP),
        }
    }

    /// Calcula cuánto tiempo ejecuta un despacho dado el trabajo restante.
    ///
    /// # Arguments
    ///
    /// * `remaining` - Ráfaga pendiente del proceso despachado
    ///
    /// # Returns
    ///
    /// Todo lo pendiente en los no preemptivos, hasta un quantum en Round
    /// Robin y hasta un paso en los preemptivos
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::SchedulingAlgorithm;
    ///
    /// assert_eq!(SchedulingAlgorithm::Fcfs.calculate_slice(7.0), 7.0);
    /// assert_eq!(SchedulingAlgorithm::round_robin(4.0).calculate_slice(7.0), 4.0);
    /// assert_eq!(SchedulingAlgorithm::SjfPreemptive.calculate_slice(0.5), 0.5);
    /// ```
    pub fn calculate_slice(&self, remaining: Time) -> Time {
        match self {
            Self::Fcfs | Self::SjfNonPreemptive | Self::PriorityNonPreemptive => remaining,
            Self::RoundRobin { quantum } => remaining.min(*quantum),
            Self::SjfPreemptive | Self::PriorityPreemptive => {
                remaining.min(config::PREEMPTION_STEP)
            }
        }
    }

    /// Quantum configurado (solo Round Robin).
    pub fn quantum(&self) -> Option<Time> {
        match self {
            Self::RoundRobin { quantum } => Some(*quantum),
            _ => None,
        }
    }

    /// Etiqueta corta usada en los nombres de los reportes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::SjfNonPreemptive => "SJF_NONPRE",
            Self::SjfPreemptive => "SJF_PRE",
            Self::RoundRobin { .. } => "RR",
            Self::PriorityNonPreemptive => "PRIO_NONPRE",
            Self::PriorityPreemptive => "PRIO_PRE",
        }
    }

    /// Descripción textual del algoritmo y sus parámetros.
    pub fn description(&self) -> String {
        match self {
            Self::Fcfs => "First-Come First-Served (no preemptivo)".to_string(),
            Self::SjfNonPreemptive => "Shortest-Job-First (no preemptivo)".to_string(),
            Self::SjfPreemptive => "Shortest-Remaining-Time-First (preemptivo)".to_string(),
            Self::RoundRobin { quantum } => {
                format!("Round Robin preemptivo (quantum: {})", quantum)
            }
            Self::PriorityNonPreemptive => "Prioridad (no preemptivo)".to_string(),
            Self::PriorityPreemptive => "Prioridad (preemptivo)".to_string(),
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin { quantum } => write!(f, "RR (quantum {})", quantum),
            other => f.write_str(other.label()),
        }
    }
}
