//! # Módulo de Línea de Tiempo
//!
//! La línea de tiempo es la secuencia de segmentos `(inicio, fin, ocupante)`
//! que produce un motor. Hay una sola CPU simulada, así que los segmentos
//! no se solapan y se agregan en orden creciente de inicio.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::process::Time;

/// Quién ocupa la CPU durante un segmento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Idle,
    Process(String),
}

impl Occupant {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn process_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Process(id) => Some(id.as_str()),
        }
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::Process(id) => f.write_str(id),
        }
    }
}

/// Intervalo contiguo con un único ocupante. Siempre `end > start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Time,
    pub end: Time,
    pub occupant: Occupant,
}

impl Segment {
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

/// Secuencia ordenada de segmentos de una ejecución.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un segmento si tiene duración positiva.
    ///
    /// Un segmento `IDLE` contiguo a otro `IDLE` se fusiona con él, de modo
    /// que la espera activa paso a paso no fragmenta la línea de tiempo.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::timeline::{Occupant, Timeline};
    ///
    /// let mut timeline = Timeline::new();
    /// timeline.push(0.0, 1.0, Occupant::Idle);
    /// timeline.push(1.0, 2.0, Occupant::Idle);
    /// timeline.push(2.0, 2.0, Occupant::Process("A".into()));
    /// assert_eq!(timeline.len(), 1);
    /// assert_eq!(timeline.segments()[0].end, 2.0);
    /// ```
    pub fn push(&mut self, start: Time, end: Time, occupant: Occupant) {
        if end <= start {
            return;
        }
        debug_assert!(
            self.segments.last().map_or(true, |last| last.end <= start),
            "Segment [{start}, {end}) overlaps the previous one"
        );

        if occupant.is_idle() {
            if let Some(last) = self.segments.last_mut() {
                if last.occupant.is_idle() && last.end == start {
                    last.end = end;
                    return;
                }
            }
        }

        self.segments.push(Segment {
            start,
            end,
            occupant,
        });
    }

    /// Segmentos en orden de inicio.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Tiempo total con algún proceso en CPU (excluye `IDLE`).
    pub fn busy_time(&self) -> Time {
        self.segments
            .iter()
            .filter(|s| !s.occupant.is_idle())
            .map(Segment::duration)
            .sum()
    }

    /// Tiempo total que el proceso `id` ocupó la CPU.
    ///
    /// # Arguments
    ///
    /// * `id` - Identificador del proceso
    ///
    /// # Returns
    ///
    /// La suma de sus segmentos; `0` si nunca ocupó la CPU
    pub fn time_for(&self, id: &str) -> Time {
        self.segments
            .iter()
            .filter(|s| s.occupant.process_id() == Some(id))
            .map(Segment::duration)
            .sum()
    }

    /// Verifica que los segmentos estén ordenados y no se solapen.
    pub fn is_well_formed(&self) -> bool {
        self.segments.iter().all(|s| s.end > s.start)
            && self
                .segments
                .windows(2)
                .all(|pair| pair[0].end <= pair[1].start)
    }
}

// Diagrama de Gantt en una línea: `[0-5 A] [5-8 B]`
impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "[{}-{} {}]", segment.start, segment.end, segment.occupant)?;
        }
        Ok(())
    }
}
