use std::time::{Duration, Instant};

/// Intervalle entre deux frames pour un fps donné.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tvp_core::clock::frame_interval;
/// assert_eq!(frame_interval(25.0), Duration::from_millis(40));
/// ```
#[must_use]
pub fn frame_interval(fps: f64) -> Duration {
    Duration::from_secs_f64(1.0 / fps)
}

/// Temps de sommeil restant une fois la frame rendue.
///
/// `None` si le rendu a consommé tout l'intervalle : la frame suivante est
/// lue immédiatement, sans rattrapage ni saut de frames source.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tvp_core::clock::sleep_budget;
/// let interval = Duration::from_millis(40);
/// assert_eq!(sleep_budget(interval, Duration::from_millis(15)), Some(Duration::from_millis(25)));
/// assert_eq!(sleep_budget(interval, Duration::from_millis(55)), None);
/// ```
#[inline]
#[must_use]
pub fn sleep_budget(interval: Duration, elapsed: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// Cadence la boucle de lecture sur un intervalle cible.
///
/// Chaque frame est mesurée depuis `begin_frame()` ; un dépassement n'est
/// jamais compensé sur les frames suivantes.
pub struct FramePacer {
    interval: Duration,
    frame_start: Instant,
    /// Frames dont le rendu a dépassé l'intervalle.
    pub overruns: u64,
}

impl FramePacer {
    /// Crée un pacer pour l'intervalle donné.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frame_start: Instant::now(),
            overruns: 0,
        }
    }

    /// Intervalle cible.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Marque le début d'une frame (avant la lecture source).
    #[inline]
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Durée à dormir pour la frame courante, `None` en cas de dépassement.
    pub fn remaining(&mut self) -> Option<Duration> {
        let budget = sleep_budget(self.interval, self.frame_start.elapsed());
        if budget.is_none() {
            self.overruns += 1;
        }
        budget
    }

    /// Dort le temps restant de la frame courante, si il en reste.
    pub fn wait(&mut self) {
        if let Some(remaining) = self.remaining() {
            std::thread::sleep(remaining);
        }
    }
}
