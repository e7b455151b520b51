//! Coordinador de cómputo: a lo sumo una computación en vuelo por
//! fingerprint.
//!
//! Máquina de estados por fingerprint: `Idle → Computing → Done`.
//! - El primer llamador que inserta el slot es el líder y ejecuta el
//!   cómputo; los demás esperan sobre el mismo slot.
//! - El líder publica el resultado en el store ANTES de despertar a los
//!   esperadores: un esperador siempre observa un hit, nunca recomputa.
//! - Si el cómputo falla, el slot desaparece (estado vuelve a Idle) y el
//!   error se propaga a todos los esperadores sin reintento silencioso.
//! - Un esperador que agota su timeout recibe `Busy` y puede reintentar;
//!   abandonar la espera no afecta al líder ni a otros esperadores.
//!
//! No hay lock global: fingerprints distintos nunca se bloquean entre sí.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_WAIT_TIMEOUT_MS;
use crate::errors::CoreError;
use crate::model::{CanonicalResult, Fingerprint};
use crate::store::ResultStore;

/// Cómo se satisfizo la solicitud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Espera máxima sobre un cómputo en vuelo ajeno antes de `Busy`.
    pub wait_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { wait_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS) }
    }
}

enum SlotState {
    Computing,
    Done(Result<CanonicalResult, CoreError>),
}

/// Slot de vuelo compartido entre líder y esperadores. Los esperadores
/// retienen su `Arc` aunque el slot ya se haya retirado del mapa.
struct FlightSlot {
    state: Mutex<SlotState>,
    cv: Condvar,
}

impl FlightSlot {
    fn new() -> Self {
        Self { state: Mutex::new(SlotState::Computing), cv: Condvar::new() }
    }
}

pub struct ComputationCoordinator<S: ResultStore> {
    store: Arc<S>,
    inflight: DashMap<String, Arc<FlightSlot>>,
    config: CoordinatorConfig,
}

impl<S: ResultStore> ComputationCoordinator<S> {
    pub fn new(store: Arc<S>, config: CoordinatorConfig) -> Self {
        Self { store, inflight: DashMap::new(), config }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Devuelve el resultado canónico del fingerprint, computándolo a lo
    /// sumo una vez entre todos los llamadores concurrentes.
    ///
    /// El primer llamador en adquirir el slot determina el resultado que
    /// observan todos (incluido él mismo); nadie publica un segundo
    /// resultado distinto bajo la misma versión del generador.
    pub fn compute_or_wait<F>(
        &self,
        fingerprint: &Fingerprint,
        compute: F,
    ) -> Result<(CanonicalResult, CacheStatus), CoreError>
    where
        F: FnOnce() -> Result<CanonicalResult, CoreError>,
    {
        if let Some(hit) = self.store.get(fingerprint) {
            return Ok((hit, CacheStatus::Hit));
        }

        let (slot, is_leader) = {
            use dashmap::mapref::entry::Entry;
            match self.inflight.entry(fingerprint.as_hex().to_string()) {
                Entry::Occupied(occupied) => (occupied.get().clone(), false),
                Entry::Vacant(vacant) => {
                    let slot = Arc::new(FlightSlot::new());
                    vacant.insert(slot.clone());
                    (slot, true)
                }
            }
        };

        if is_leader {
            self.lead(fingerprint, &slot, compute)
        } else {
            self.wait(&slot)
        }
    }

    fn lead<F>(
        &self,
        fingerprint: &Fingerprint,
        slot: &Arc<FlightSlot>,
        compute: F,
    ) -> Result<(CanonicalResult, CacheStatus), CoreError>
    where
        F: FnOnce() -> Result<CanonicalResult, CoreError>,
    {
        // Re-chequeo: otro líder pudo publicar entre nuestro miss y la
        // inserción del slot.
        if let Some(hit) = self.store.get(fingerprint) {
            self.finish(fingerprint, slot, Ok(hit.clone()));
            return Ok((hit, CacheStatus::Hit));
        }

        let outcome = compute().and_then(|result| {
            // publicar antes de despertar: los esperadores ven un hit
            self.store.put(result.clone())?;
            Ok(result)
        });
        self.finish(fingerprint, slot, outcome.clone());
        outcome.map(|result| (result, CacheStatus::Miss))
    }

    fn finish(
        &self,
        fingerprint: &Fingerprint,
        slot: &Arc<FlightSlot>,
        outcome: Result<CanonicalResult, CoreError>,
    ) {
        {
            let mut state = slot.state.lock();
            *state = SlotState::Done(outcome);
        }
        slot.cv.notify_all();
        self.inflight.remove(fingerprint.as_hex());
    }

    fn wait(&self, slot: &Arc<FlightSlot>) -> Result<(CanonicalResult, CacheStatus), CoreError> {
        let mut state = slot.state.lock();
        loop {
            match &*state {
                SlotState::Done(Ok(result)) => return Ok((result.clone(), CacheStatus::Hit)),
                SlotState::Done(Err(e)) => return Err(e.clone()),
                SlotState::Computing => {
                    let timed_out =
                        slot.cv.wait_for(&mut state, self.config.wait_timeout).timed_out();
                    if timed_out && matches!(&*state, SlotState::Computing) {
                        return Err(CoreError::Busy);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hash_str;
    use crate::store::InMemoryResultStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn fp(seed: &str) -> Fingerprint {
        Fingerprint::parse(&hash_str(seed)).unwrap()
    }

    fn coordinator() -> ComputationCoordinator<InMemoryResultStore> {
        ComputationCoordinator::new(
            Arc::new(InMemoryResultStore::new()),
            CoordinatorConfig::default(),
        )
    }

    #[test]
    fn miss_then_hit_sequential() {
        let coord = coordinator();
        let f = fp("s1");
        let (r1, st1) = coord
            .compute_or_wait(&f, || Ok(CanonicalResult::new(fp("s1"), json!({"v": 1}))))
            .unwrap();
        assert_eq!(st1, CacheStatus::Miss);
        let (r2, st2) = coord
            .compute_or_wait(&f, || panic!("no debe recomputar"))
            .unwrap();
        assert_eq!(st2, CacheStatus::Hit);
        assert!(r1.content_equals(&r2));
    }

    #[test]
    fn concurrent_callers_compute_exactly_once() {
        let coord = Arc::new(coordinator());
        let computations = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..10 {
            let coord = coord.clone();
            let computations = computations.clone();
            handles.push(thread::spawn(move || {
                coord.compute_or_wait(&fp("shared"), || {
                    computations.fetch_add(1, Ordering::SeqCst);
                    // simula un cómputo con duración observable
                    thread::sleep(std::time::Duration::from_millis(30));
                    Ok(CanonicalResult::new(fp("shared"), json!({"v": 7})))
                })
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
        assert_eq!(computations.load(Ordering::SeqCst), 1);
        let hits = results.iter().filter(|(_, st)| *st == CacheStatus::Hit).count();
        assert_eq!(hits, 9);
        for (r, _) in &results {
            assert!(r.content_equals(&results[0].0));
        }
    }

    #[test]
    fn distinct_fingerprints_do_not_block_each_other() {
        let coord = Arc::new(coordinator());
        let slow = {
            let coord = coord.clone();
            thread::spawn(move || {
                coord.compute_or_wait(&fp("slow"), || {
                    thread::sleep(std::time::Duration::from_millis(150));
                    Ok(CanonicalResult::new(fp("slow"), json!({"v": "slow"})))
                })
            })
        };
        // mientras "slow" está en vuelo, "fast" completa sin esperar
        let (_, st) = coord
            .compute_or_wait(&fp("fast"), || {
                Ok(CanonicalResult::new(fp("fast"), json!({"v": "fast"})))
            })
            .unwrap();
        assert_eq!(st, CacheStatus::Miss);
        slow.join().unwrap().unwrap();
    }

    #[test]
    fn waiter_times_out_with_busy_and_can_retry() {
        let coord = Arc::new(ComputationCoordinator::new(
            Arc::new(InMemoryResultStore::new()),
            CoordinatorConfig { wait_timeout: Duration::from_millis(20) },
        ));
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let leader = {
            let coord = coord.clone();
            thread::spawn(move || {
                coord.compute_or_wait(&fp("s1"), move || {
                    started_tx.send(()).ok();
                    thread::sleep(std::time::Duration::from_millis(200));
                    Ok(CanonicalResult::new(fp("s1"), json!({"v": 1})))
                })
            })
        };
        started_rx.recv().unwrap();
        let err = coord
            .compute_or_wait(&fp("s1"), || panic!("el esperador no computa"))
            .unwrap_err();
        assert_eq!(err, CoreError::Busy);
        assert!(err.is_recoverable());
        leader.join().unwrap().unwrap();
        // tras completar el líder, el reintento observa el hit
        let (_, st) = coord
            .compute_or_wait(&fp("s1"), || panic!("ya está en cache"))
            .unwrap();
        assert_eq!(st, CacheStatus::Hit);
    }

    #[test]
    fn leader_error_surfaces_to_waiters_and_resets_state() {
        let coord = Arc::new(coordinator());
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let leader = {
            let coord = coord.clone();
            thread::spawn(move || {
                coord.compute_or_wait(&fp("s1"), move || {
                    started_tx.send(()).ok();
                    thread::sleep(std::time::Duration::from_millis(80));
                    Err(CoreError::Internal("cómputo fallido".into()))
                })
            })
        };
        started_rx.recv().unwrap();
        let waiter_err = coord
            .compute_or_wait(&fp("s1"), || panic!("el esperador no computa"))
            .unwrap_err();
        assert!(matches!(waiter_err, CoreError::Internal(_)));
        assert!(leader.join().unwrap().is_err());
        // estado de vuelta en Idle: un nuevo llamador puede computar
        let (_, st) = coord
            .compute_or_wait(&fp("s1"), || Ok(CanonicalResult::new(fp("s1"), json!({"v": 2}))))
            .unwrap();
        assert_eq!(st, CacheStatus::Miss);
    }
}
