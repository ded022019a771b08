//! # Simulador de Planificación de CPU
//!
//! Esta biblioteca simula disciplinas de planificación de CPU sobre un
//! conjunto fijo de procesos (llegada, ráfaga de CPU, prioridad) y reporta
//! métricas de rendimiento para cada una.
//!
//! ## Características principales
//!
//! - **Seis algoritmos**: FCFS, SJF no preemptivo, SRTF, Round Robin con
//!   quantum configurable y prioridad preemptiva y no preemptiva.
//! - **Un solo motor**: todos los algoritmos comparten el mismo bucle de
//!   tiempo discreto; solo cambian la disciplina de la cola de listos, la
//!   duración de cada despacho y la política de espera.
//! - **Tiempo simulado**: el reloj es un acumulador que avanza el propio
//!   motor; nunca se espera tiempo real.
//! - **Métricas**: espera, turnaround, throughput en horizontes fijos,
//!   eficiencia de CPU y cambios de contexto.
//!
//! ## Estructura del proyecto
//!
//! - `process`: registro inmutable de un proceso y carga de trabajo validada
//! - `scheduler`: los seis algoritmos y sus políticas
//! - `ready_queue`: admisión de llegadas y colas de listos
//! - `timeline`: segmentos de ocupación de la CPU
//! - `engine`: el bucle de simulación
//! - `metrics`: cálculo de métricas y reportes
//! - `simulation`: orquestador que corre los seis algoritmos
//! - `input` / `report`: lectura de procesos y escritura de reportes

pub mod engine;
pub mod error;
pub mod input;
pub mod metrics;
pub mod process;
pub mod ready_queue;
pub mod report;
pub mod scheduler;
pub mod simulation;
pub mod timeline;

// Re-exportar las estructuras principales para facilitar su uso
pub use config::SimulationConfig;
pub use engine::Schedule;
pub use error::{Result, SimulationError};
pub use metrics::{MetricsCalculator, SchedulingMetrics};
pub use process::{Process, Workload};
pub use report::ReportFormat;
pub use scheduler::SchedulingAlgorithm;
pub use simulation::Simulation;

/// Configuración por defecto del simulador
pub mod config {
    use crate::error::{Result, SimulationError};
    use crate::process::Time;

    /// Quantum por defecto para Round Robin
    pub const DEFAULT_QUANTUM: Time = 4.0;

    /// Costo fijo de cada cambio de contexto, igual para todos los algoritmos
    pub const DEFAULT_CONTEXT_SWITCH_COST: Time = 0.001;

    /// Horizontes en los que se mide el throughput
    pub const DEFAULT_THROUGHPUT_HORIZONS: [u32; 4] = [50, 100, 150, 200];

    /// Avance del reloj cuando no hay procesos listos (salvo FCFS)
    pub const IDLE_STEP: Time = 1.0;

    /// Duración de cada paso de los algoritmos preemptivos
    pub const PREEMPTION_STEP: Time = 1.0;

    /// Prioridad asignada a una celda de prioridad vacía
    pub const BLANK_PRIORITY: i32 = 0;

    /// Prioridad asignada a un texto de prioridad no reconocido
    pub const FALLBACK_PRIORITY: i32 = 1;

    /// Parámetros de una simulación.
    ///
    /// Se pasa explícitamente al orquestador y a los motores; no hay estado
    /// global.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::SimulationConfig;
    ///
    /// let config = SimulationConfig::default()
    ///     .with_quantum(2.0)
    ///     .with_throughput_horizons(vec![10, 20]);
    /// assert!(config.validate().is_ok());
    /// assert!(config.with_quantum(0.0).validate().is_err());
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SimulationConfig {
        /// Quantum de Round Robin (> 0)
        pub quantum: Time,
        /// Costo de cada cambio de contexto (>= 0)
        pub context_switch_cost: Time,
        /// Horizontes de throughput, en el orden en que se reportan
        pub throughput_horizons: Vec<u32>,
    }

    impl SimulationConfig {
        /// Reemplaza el quantum de Round Robin.
        pub fn with_quantum(mut self, quantum: Time) -> Self {
            self.quantum = quantum;
            self
        }

        /// Reemplaza el costo cobrado antes de cada despacho.
        pub fn with_context_switch_cost(mut self, cost: Time) -> Self {
            self.context_switch_cost = cost;
            self
        }

        /// Reemplaza los horizontes de throughput.
        pub fn with_throughput_horizons(mut self, horizons: Vec<u32>) -> Self {
            self.throughput_horizons = horizons;
            self
        }

        /// Verifica que los parámetros estén en rango.
        ///
        /// # Errors
        ///
        /// `InvalidConfig` si el quantum no es positivo o el costo de cambio
        /// de contexto es negativo o no finito.
        pub fn validate(&self) -> Result<()> {
            if !self.quantum.is_finite() || self.quantum <= 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "el quantum debe ser > 0 (recibido {})",
                    self.quantum
                )));
            }
            if !self.context_switch_cost.is_finite() || self.context_switch_cost < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "el costo de cambio de contexto debe ser >= 0 (recibido {})",
                    self.context_switch_cost
                )));
            }
            Ok(())
        }
    }

    impl Default for SimulationConfig {
        fn default() -> Self {
            Self {
                quantum: DEFAULT_QUANTUM,
                context_switch_cost: DEFAULT_CONTEXT_SWITCH_COST,
                throughput_horizons: DEFAULT_THROUGHPUT_HORIZONS.to_vec(),
            }
        }
    }
}
