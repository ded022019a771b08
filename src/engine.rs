//! # Motor de Simulación
//!
//! Bucle de tiempo discreto común a los seis algoritmos:
//!
//! 1. Admite los procesos cuya llegada ya ocurrió
//! 2. Elige el siguiente proceso según la disciplina de la cola de listos
//! 3. Cobra el costo de cambio de contexto cuando cambia el ocupante
//! 4. Avanza el reloj simulado y registra segmentos en la línea de tiempo
//! 5. Registra la finalización cuando el trabajo restante llega a cero
//!
//! Lo que distingue a cada algoritmo (orden de la cola, duración del
//! despacho, política de espera) lo decide `SchedulingAlgorithm`; el motor
//! no tiene un bucle propio por algoritmo.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::process::{Process, Time, Workload};
use crate::ready_queue::{ArrivalCursor, ReadyQueue};
use crate::scheduler::{Discipline, IdlePolicy, SchedulingAlgorithm};
use crate::timeline::{Occupant, Timeline};

/// Resultado de ejecutar un algoritmo sobre una carga de trabajo.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    /// Algoritmo que produjo el plan
    pub algorithm: SchedulingAlgorithm,
    /// Segmentos de ocupación de la CPU
    pub timeline: Timeline,
    /// Instante de finalización de cada proceso
    pub completions: BTreeMap<String, Time>,
    /// Cantidad de cambios de contexto cobrados
    pub context_switches: u64,
    /// Reloj simulado al terminar
    pub total_time: Time,
}

impl Schedule {
    pub fn completion(&self, id: &str) -> Option<Time> {
        self.completions.get(id).copied()
    }
}

/// Proceso que ocupa la CPU en un motor de pasos unitarios, con el
/// inicio de su segmento abierto.
#[derive(Debug, Clone, Copy)]
struct Running {
    index: usize,
    since: Time,
}

/// Estado de una ejecución. Cada ejecución es independiente y no comparte
/// nada mutable con otras.
pub struct Engine<'a> {
    processes: &'a [Process],
    algorithm: SchedulingAlgorithm,
    context_switch_cost: Time,

    now: Time,
    context_switches: u64,
    timeline: Timeline,
    completions: BTreeMap<String, Time>,
    remaining: Vec<Time>,
    arrivals: ArrivalCursor,
    ready: ReadyQueue<'a>,
    running: Option<Running>,
}

impl<'a> Engine<'a> {
    pub fn new(
        workload: &'a Workload,
        algorithm: SchedulingAlgorithm,
        context_switch_cost: Time,
    ) -> Self {
        let processes = workload.processes();
        Self {
            processes,
            algorithm,
            context_switch_cost,
            now: 0.0,
            context_switches: 0,
            timeline: Timeline::new(),
            completions: BTreeMap::new(),
            remaining: processes.iter().map(|p| p.burst).collect(),
            arrivals: ArrivalCursor::new(),
            ready: ReadyQueue::new(algorithm.discipline()),
            running: None,
        }
    }

    /// Ejecuta la simulación completa y devuelve el plan resultante.
    pub fn run(mut self) -> Schedule {
        while self.completions.len() < self.processes.len() {
            self.admit();

            let Some(index) = self.ready.pop() else {
                if self.arrivals.next_arrival(self.processes).is_none() {
                    // Nada listo ni por llegar: no queda trabajo
                    break;
                }
                self.wait_idle();
                continue;
            };

            if self.algorithm.is_stepwise() {
                self.step(index);
            } else {
                self.dispatch(index);
            }
        }

        debug_assert_eq!(
            self.completions.len(),
            self.processes.len(),
            "Every process must complete exactly once"
        );
        debug!(
            "{}: {} procesos completados en t={} ({} cambios de contexto)",
            self.algorithm,
            self.completions.len(),
            self.now,
            self.context_switches
        );

        Schedule {
            algorithm: self.algorithm,
            timeline: self.timeline,
            completions: self.completions,
            context_switches: self.context_switches,
            total_time: self.now,
        }
    }

    fn admit(&mut self) {
        for index in self.arrivals.admit(self.processes, self.now) {
            trace!("t={} llega {}", self.now, self.processes[index].id);
            self.enqueue(index);
        }
    }

    fn enqueue(&mut self, index: usize) {
        let processes = self.processes;
        let process = &processes[index];
        let key = match self.algorithm.discipline() {
            Discipline::Fifo => 0.0,
            Discipline::ShortestRemaining => self.remaining[index],
            Discipline::HighestPriority => f64::from(process.priority),
        };
        self.ready.push(index, process, key);
    }

    fn wait_idle(&mut self) {
        let start = self.now;
        match self.algorithm.idle_policy() {
            IdlePolicy::JumpToArrival => {
                if let Some(arrival) = self.arrivals.next_arrival(self.processes) {
                    self.now = self.now.max(arrival);
                }
            }
            IdlePolicy::Step(step) => self.now += step,
        }
        trace!("t={} CPU ociosa hasta t={}", start, self.now);
        self.timeline.push(start, self.now, Occupant::Idle);
    }

    fn context_switch(&mut self) {
        self.context_switches += 1;
        self.now += self.context_switch_cost;
    }

    /// Despacho exclusivo: FCFS, SJF y prioridad no preemptivos, y Round
    /// Robin. Cada despacho cobra un cambio de contexto y emite su segmento.
    fn dispatch(&mut self, index: usize) {
        self.context_switch();

        let slice = self.algorithm.calculate_slice(self.remaining[index]);
        let start = self.now;
        self.now += slice;
        self.remaining[index] -= slice;

        let id = &self.processes[index].id;
        debug!("t={} despacha {} por {}", start, id, slice);
        self.timeline.push(start, self.now, Occupant::Process(id.clone()));

        if self.remaining[index] <= 0.0 {
            self.complete(index);
        } else {
            // Lo que llegó durante el quantum entra antes que el reencolado
            self.admit();
            self.enqueue(index);
        }
    }

    /// Paso unitario de los algoritmos preemptivos. El segmento del proceso
    /// en curso queda abierto mientras nadie lo desplace.
    fn step(&mut self, index: usize) {
        if self.running.map(|r| r.index) != Some(index) {
            if let Some(previous) = self.running {
                debug!(
                    "t={} {} desplaza a {}",
                    self.now, self.processes[index].id, self.processes[previous.index].id
                );
            }
            self.close_running();
            self.context_switch();
            self.running = Some(Running {
                index,
                since: self.now,
            });
        }

        let slice = self.algorithm.calculate_slice(self.remaining[index]);
        self.now += slice;
        self.remaining[index] -= slice;

        if self.remaining[index] <= 0.0 {
            self.close_running();
            self.complete(index);
        } else {
            self.enqueue(index);
        }
    }

    fn close_running(&mut self) {
        if let Some(Running { index, since }) = self.running.take() {
            let id = self.processes[index].id.clone();
            self.timeline.push(since, self.now, Occupant::Process(id));
        }
    }

    fn complete(&mut self, index: usize) {
        self.remaining[index] = 0.0;
        let id = self.processes[index].id.clone();
        trace!("t={} termina {}", self.now, id);
        let previous = self.completions.insert(id, self.now);
        debug_assert!(previous.is_none(), "Process completed twice");
    }
}

/// Ejecuta `algorithm` sobre `workload` con el costo de cambio de contexto
/// de `config`.
///
/// # Arguments
///
/// * `workload` - Carga de trabajo validada y ordenada
/// * `algorithm` - Algoritmo a simular
/// * `config` - Parámetros de la simulación
///
/// # Returns
///
/// El `Schedule` con la línea de tiempo, las finalizaciones y los cambios
/// de contexto cobrados. Una carga vacía produce un plan vacío.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::{engine, Process, SchedulingAlgorithm, SimulationConfig, Workload};
///
/// let workload = Workload::new(vec![
///     Process::new("A", 0.0, 5.0, 1),
///     Process::new("B", 2.0, 3.0, 1),
/// ]).unwrap();
/// let config = SimulationConfig::default().with_context_switch_cost(0.0);
///
/// let schedule = engine::simulate(&workload, SchedulingAlgorithm::Fcfs, &config);
/// assert_eq!(schedule.completion("B"), Some(8.0));
/// assert_eq!(schedule.timeline.to_string(), "[0-5 A] [5-8 B]");
/// ```
pub fn simulate(
    workload: &Workload,
    algorithm: SchedulingAlgorithm,
    config: &SimulationConfig,
) -> Schedule {
    Engine::new(workload, algorithm, config.context_switch_cost).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workload(processes: &[(&str, f64, f64, i32)]) -> Workload {
        Workload::new(
            processes
                .iter()
                .map(|&(id, arrival, burst, priority)| Process::new(id, arrival, burst, priority))
                .collect(),
        )
        .unwrap()
    }

    fn no_switch_cost() -> SimulationConfig {
        SimulationConfig::default().with_context_switch_cost(0.0)
    }

    fn segments(schedule: &Schedule) -> Vec<(f64, f64, String)> {
        schedule
            .timeline
            .iter()
            .map(|s| (s.start, s.end, s.occupant.to_string()))
            .collect()
    }

    fn seg(start: f64, end: f64, who: &str) -> (f64, f64, String) {
        (start, end, who.to_string())
    }

    #[test]
    fn test_fcfs_runs_in_arrival_order() {
        let w = workload(&[("A", 0.0, 5.0, 1), ("B", 2.0, 3.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::Fcfs, &no_switch_cost());

        assert_eq!(segments(&schedule), vec![seg(0.0, 5.0, "A"), seg(5.0, 8.0, "B")]);
        assert_eq!(schedule.completion("A"), Some(5.0));
        assert_eq!(schedule.completion("B"), Some(8.0));
        assert_eq!(schedule.context_switches, 2);
        assert_eq!(schedule.total_time, 8.0);
    }

    #[test]
    fn test_fcfs_jumps_idle_gap() {
        let w = workload(&[("A", 0.0, 2.0, 1), ("B", 5.5, 1.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::Fcfs, &no_switch_cost());

        assert_eq!(
            segments(&schedule),
            vec![seg(0.0, 2.0, "A"), seg(2.0, 5.5, "IDLE"), seg(5.5, 6.5, "B")]
        );
    }

    #[test]
    fn test_context_switch_cost_is_charged_per_dispatch() {
        let w = workload(&[("A", 0.0, 1.0, 1), ("B", 0.0, 1.0, 1)]);
        let config = SimulationConfig::default().with_context_switch_cost(0.5);
        let schedule = simulate(&w, SchedulingAlgorithm::Fcfs, &config);

        assert_eq!(segments(&schedule), vec![seg(0.5, 1.5, "A"), seg(2.0, 3.0, "B")]);
        assert_eq!(schedule.total_time, 3.0);
    }

    #[test]
    fn test_sjf_non_preemptive_picks_shortest_ready() {
        let w = workload(&[("A", 0.0, 4.0, 1), ("B", 1.0, 3.0, 1), ("C", 1.0, 1.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::SjfNonPreemptive, &no_switch_cost());

        // A no se interrumpe; luego C (1) antes que B (3)
        assert_eq!(
            segments(&schedule),
            vec![seg(0.0, 4.0, "A"), seg(4.0, 5.0, "C"), seg(5.0, 8.0, "B")]
        );
    }

    #[test]
    fn test_busy_wait_steps_one_unit() {
        let w = workload(&[("A", 2.5, 1.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::SjfNonPreemptive, &no_switch_cost());

        // Sin saltar a la llegada: t avanza 0 -> 1 -> 2 -> 3
        assert_eq!(segments(&schedule), vec![seg(0.0, 3.0, "IDLE"), seg(3.0, 4.0, "A")]);
        assert_eq!(schedule.completion("A"), Some(4.0));
    }

    #[test]
    fn test_srtf_preempts_longer_job() {
        let w = workload(&[("A", 0.0, 8.0, 1), ("B", 1.0, 4.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::SjfPreemptive, &no_switch_cost());

        assert_eq!(
            segments(&schedule),
            vec![seg(0.0, 1.0, "A"), seg(1.0, 5.0, "B"), seg(5.0, 12.0, "A")]
        );
        assert_eq!(schedule.completion("B"), Some(5.0));
        assert_eq!(schedule.completion("A"), Some(12.0));
        assert_eq!(schedule.context_switches, 3);
    }

    #[test]
    fn test_srtf_does_not_switch_for_continuing_process() {
        let w = workload(&[("A", 0.0, 3.0, 1), ("B", 1.0, 5.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::SjfPreemptive, &no_switch_cost());

        assert_eq!(segments(&schedule), vec![seg(0.0, 3.0, "A"), seg(3.0, 8.0, "B")]);
        assert_eq!(schedule.context_switches, 2);
    }

    #[test]
    fn test_round_robin_alternates() {
        let w = workload(&[("A", 0.0, 5.0, 1), ("B", 0.0, 5.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::round_robin(4.0), &no_switch_cost());

        assert_eq!(
            segments(&schedule),
            vec![
                seg(0.0, 4.0, "A"),
                seg(4.0, 8.0, "B"),
                seg(8.0, 9.0, "A"),
                seg(9.0, 10.0, "B"),
            ]
        );
        assert_eq!(schedule.context_switches, 4);
    }

    #[test]
    fn test_round_robin_admits_arrivals_before_requeue() {
        let w = workload(&[("A", 0.0, 6.0, 1), ("B", 2.0, 2.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::round_robin(4.0), &no_switch_cost());

        // B llegó durante el quantum de A, así que va antes que A reencolado
        assert_eq!(
            segments(&schedule),
            vec![seg(0.0, 4.0, "A"), seg(4.0, 6.0, "B"), seg(6.0, 8.0, "A")]
        );
    }

    #[test]
    fn test_priority_non_preemptive_orders_by_rank() {
        let w = workload(&[("A", 0.0, 2.0, 2), ("B", 0.0, 2.0, 0), ("C", 0.0, 2.0, 1)]);
        let schedule = simulate(
            &w,
            SchedulingAlgorithm::PriorityNonPreemptive,
            &no_switch_cost(),
        );

        let order: Vec<String> = segments(&schedule).into_iter().map(|s| s.2).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_priority_preemptive_yields_to_higher_priority() {
        let w = workload(&[("A", 0.0, 4.0, 2), ("B", 2.0, 1.0, 0)]);
        let schedule = simulate(&w, SchedulingAlgorithm::PriorityPreemptive, &no_switch_cost());

        assert_eq!(
            segments(&schedule),
            vec![seg(0.0, 2.0, "A"), seg(2.0, 3.0, "B"), seg(3.0, 5.0, "A")]
        );
    }

    #[test]
    fn test_priority_ties_use_process_order() {
        let w = workload(&[("B", 0.0, 1.0, 1), ("A", 0.0, 1.0, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::PriorityPreemptive, &no_switch_cost());

        assert_eq!(segments(&schedule), vec![seg(0.0, 1.0, "A"), seg(1.0, 2.0, "B")]);
    }

    #[test]
    fn test_fractional_burst_terminates() {
        let w = workload(&[("A", 0.0, 2.5, 1)]);
        let schedule = simulate(&w, SchedulingAlgorithm::SjfPreemptive, &no_switch_cost());

        assert_eq!(schedule.completion("A"), Some(2.5));
        assert_eq!(segments(&schedule), vec![seg(0.0, 2.5, "A")]);
    }

    #[test]
    fn test_zero_burst_completes_without_segment() {
        let w = workload(&[("A", 0.0, 0.0, 1), ("B", 0.0, 2.0, 1)]);
        for algorithm in SchedulingAlgorithm::all(4.0) {
            let schedule = simulate(&w, algorithm, &no_switch_cost());
            assert_eq!(schedule.completions.len(), 2, "{}", algorithm);
            assert_eq!(schedule.timeline.time_for("A"), 0.0);
            assert_eq!(schedule.timeline.time_for("B"), 2.0);
        }
    }

    #[test]
    fn test_empty_workload_terminates_immediately() {
        let w = workload(&[]);
        for algorithm in SchedulingAlgorithm::all(4.0) {
            let schedule = simulate(&w, algorithm, &SimulationConfig::default());
            assert!(schedule.timeline.is_empty());
            assert!(schedule.completions.is_empty());
            assert_eq!(schedule.context_switches, 0);
            assert_eq!(schedule.total_time, 0.0);
        }
    }
}
