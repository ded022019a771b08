//! # Módulo de Cola de Listos
//!
//! Estructuras que mantienen los procesos que ya llegaron y aún no terminan:
//! el cursor de admisión compartido por todos los motores y la cola de listos
//! propiamente dicha (FIFO o montículo de mínimos).

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::ops::Range;

use crate::process::{Process, Time};
use crate::scheduler::Discipline;

/// Recorre los procesos (ordenados por llegada) y entrega cada uno una sola
/// vez, cuando el reloj alcanza su llegada.
#[derive(Debug, Default)]
pub struct ArrivalCursor {
    next: usize,
}

impl ArrivalCursor {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Devuelve los índices de todos los procesos con `arrival <= now` que
    /// aún no habían sido admitidos, en el orden de entrada.
    ///
    /// # Arguments
    ///
    /// * `processes` - Procesos ordenados por llegada
    /// * `now` - Reloj simulado actual
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::{Process, ready_queue::ArrivalCursor};
    ///
    /// let processes = vec![
    ///     Process::new("A", 0.0, 1.0, 0),
    ///     Process::new("B", 2.0, 1.0, 0),
    /// ];
    /// let mut cursor = ArrivalCursor::new();
    /// assert_eq!(cursor.admit(&processes, 0.0), 0..1);
    /// assert_eq!(cursor.admit(&processes, 1.0), 1..1);
    /// assert_eq!(cursor.admit(&processes, 5.0), 1..2);
    /// ```
    pub fn admit(&mut self, processes: &[Process], now: Time) -> Range<usize> {
        let start = self.next;
        let arrived = processes[start..]
            .iter()
            .take_while(|p| p.arrival <= now) // contiguo, la entrada está ordenada
            .count();
        self.next = start + arrived;
        start..self.next
    }

    /// Llegada del próximo proceso aún no admitido.
    pub fn next_arrival(&self, processes: &[Process]) -> Option<Time> {
        processes.get(self.next).map(|p| p.arrival)
    }
}

/// Entrada de una cola ordenada: clave de orden y proceso para desempatar.
#[derive(Debug, Clone, Copy)]
pub struct ReadyEntry<'a> {
    key: f64,
    process: &'a Process,
    index: usize,
}

// Clave primero; a igualdad de clave decide el orden natural de `Process`.
impl Ord for ReadyEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| self.process.cmp(other.process))
    }
}

impl PartialOrd for ReadyEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReadyEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReadyEntry<'_> {}

/// Cola de listos de un motor. Vive lo que dura una ejecución.
#[derive(Debug)]
pub enum ReadyQueue<'a> {
    Fifo {
        tasks: VecDeque<usize>,
    },
    // BinaryHeap es de máximos, de ahí el `Reverse`
    Ordered {
        tasks: BinaryHeap<Reverse<ReadyEntry<'a>>>,
    },
}

impl<'a> ReadyQueue<'a> {
    pub fn new(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Fifo => Self::Fifo {
                tasks: VecDeque::new(),
            },
            Discipline::ShortestRemaining | Discipline::HighestPriority => Self::Ordered {
                tasks: BinaryHeap::new(),
            },
        }
    }

    /// Encola un proceso listo.
    ///
    /// # Arguments
    ///
    /// * `index` - Posición del proceso en la carga
    /// * `process` - El proceso, usado para desempatar claves iguales
    /// * `key` - Ráfaga restante o prioridad; se ignora en la cola FIFO
    pub fn push(&mut self, index: usize, process: &'a Process, key: f64) {
        match self {
            Self::Fifo { tasks } => tasks.push_back(index),
            Self::Ordered { tasks } => tasks.push(Reverse(ReadyEntry {
                key,
                process,
                index,
            })),
        }
    }

    /// Saca el siguiente proceso a despachar: el más antiguo en FIFO, la
    /// menor `(clave, proceso)` en las colas ordenadas.
    pub fn pop(&mut self) -> Option<usize> {
        match self {
            Self::Fifo { tasks } => tasks.pop_front(),
            Self::Ordered { tasks } => tasks.pop().map(|Reverse(entry)| entry.index),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks } => tasks.len(),
            Self::Ordered { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
