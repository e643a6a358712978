//! Maintains dashboard state and bridges the API collaborator to the egui UI.
//!
//! Blocking fetches run on worker threads and post [`JobMessage`]s over an
//! mpsc channel; the UI thread drains them once per frame via
//! [`DashboardController::poll_jobs`]. Every effect invocation is stamped
//! with a request id, and a finished job whose id no longer matches the
//! latest id for its panel is discarded, so a stale response can never
//! overwrite the result of a newer selection.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use crate::api::{ApiError, CombinedRow, ConversionApi, ConversionData, Origin, Status, combined_rows};

use super::state::UiState;

/// User-facing message when the origin chart fetch fails.
pub const ORIGIN_FETCH_ERROR: &str = "Failed to load data";
/// User-facing message when the combined round fails.
pub const COMBINED_FETCH_ERROR: &str = "Failed to load combined data";

enum JobMessage {
    OriginLoaded {
        request_id: u64,
        result: Result<ConversionData, ApiError>,
    },
    CombinedLoaded {
        request_id: u64,
        result: Result<Vec<CombinedRow>, ApiError>,
    },
}

/// Owns the UI state and the background fetch plumbing.
pub struct DashboardController {
    pub ui: UiState,
    api: Arc<dyn ConversionApi>,
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    next_request_id: u64,
    latest_origin_request: Option<u64>,
    latest_combined_request: Option<u64>,
}

impl DashboardController {
    pub fn new(api: Arc<dyn ConversionApi>) -> Self {
        let (message_tx, message_rx) = channel();
        Self {
            ui: UiState::default(),
            api,
            message_tx,
            message_rx,
            next_request_id: 1,
            latest_origin_request: None,
            latest_combined_request: None,
        }
    }

    /// Kick off the initial fetches for the default selections.
    pub fn start(&mut self) {
        self.refetch_origin();
        self.refetch_combined();
    }

    /// Change the selected origin and refresh its chart.
    pub fn select_origin(&mut self, origin: Origin) {
        self.ui.origin_chart.selected = origin;
        self.refetch_origin();
    }

    /// Change the compared status and refresh the combined chart.
    pub fn select_status(&mut self, status: Status) {
        self.ui.combined_chart.selected = status;
        self.refetch_combined();
    }

    /// Re-run the origin fetch for the current selection.
    ///
    /// Also warms the collaborator for every other origin; those results are
    /// discarded and their failures only logged.
    pub fn refetch_origin(&mut self) {
        let origin = self.ui.origin_chart.selected;
        let request_id = self.next_request_id();
        self.latest_origin_request = Some(request_id);
        self.ui.origin_chart.loading = true;
        self.ui.origin_chart.error = None;

        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api.fetch(origin);
            let _ = tx.send(JobMessage::OriginLoaded { request_id, result });
        });

        for other in Origin::ALL {
            if other == origin {
                continue;
            }
            let api = Arc::clone(&self.api);
            thread::spawn(move || {
                if let Err(err) = api.fetch(other) {
                    tracing::debug!("Warm-up fetch for {other} failed: {err}");
                }
            });
        }
    }

    /// Re-run the all-origins round for the current status.
    pub fn refetch_combined(&mut self) {
        let status = self.ui.combined_chart.selected;
        let request_id = self.next_request_id();
        self.latest_combined_request = Some(request_id);
        self.ui.combined_chart.loading = true;
        self.ui.combined_chart.error = None;

        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result =
                fetch_all_origins(api.as_ref()).map(|results| combined_rows(&results, status));
            let _ = tx.send(JobMessage::CombinedLoaded { request_id, result });
        });
    }

    /// Drain finished background jobs and fold them into UI state.
    pub fn poll_jobs(&mut self) {
        loop {
            let message = match self.message_rx.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            match message {
                JobMessage::OriginLoaded { request_id, result } => {
                    if self.latest_origin_request != Some(request_id) {
                        tracing::debug!("Discarding stale origin fetch {request_id}");
                        continue;
                    }
                    self.ui.origin_chart.loading = false;
                    match result {
                        Ok(data) => self.ui.origin_chart.data = Some(data),
                        Err(err) => {
                            tracing::error!("Origin chart fetch failed: {err}");
                            self.ui.origin_chart.error = Some(ORIGIN_FETCH_ERROR.to_string());
                        }
                    }
                }
                JobMessage::CombinedLoaded { request_id, result } => {
                    if self.latest_combined_request != Some(request_id) {
                        tracing::debug!("Discarding stale combined round {request_id}");
                        continue;
                    }
                    self.ui.combined_chart.loading = false;
                    match result {
                        Ok(rows) => self.ui.combined_chart.rows = rows,
                        Err(err) => {
                            tracing::error!("Combined round failed: {err}");
                            self.ui.combined_chart.error = Some(COMBINED_FETCH_ERROR.to_string());
                        }
                    }
                }
            }
        }
    }

    /// True while either panel has a fetch in flight.
    pub fn busy(&self) -> bool {
        self.ui.origin_chart.loading || self.ui.combined_chart.loading
    }

    fn next_request_id(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        request_id
    }
}

/// Fetch every origin concurrently; any single failure fails the round.
fn fetch_all_origins(api: &dyn ConversionApi) -> Result<Vec<(Origin, ConversionData)>, ApiError> {
    thread::scope(|scope| {
        let handles: Vec<_> = Origin::ALL
            .iter()
            .map(|&origin| scope.spawn(move || (origin, api.fetch(origin))))
            .collect();
        let mut results = Vec::with_capacity(Origin::ALL.len());
        for handle in handles {
            let (origin, result) = handle
                .join()
                .map_err(|_| ApiError::Http("fetch worker panicked".to_string()))?;
            results.push((origin, result?));
        }
        Ok(results)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ConversionRate;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedApi {
        responses: Mutex<HashMap<Origin, Result<ConversionData, ApiError>>>,
    }

    impl ScriptedApi {
        fn all_ok() -> Self {
            let mut responses = HashMap::new();
            for origin in Origin::ALL {
                responses.insert(origin, Ok(sample_data(origin)));
            }
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl ConversionApi for ScriptedApi {
        fn fetch(&self, origin: Origin) -> Result<ConversionData, ApiError> {
            self.responses
                .lock()
                .unwrap()
                .get(&origin)
                .cloned()
                .unwrap_or_else(|| Err(ApiError::Http("unscripted origin".to_string())))
        }
    }

    fn sample_data(origin: Origin) -> ConversionData {
        ConversionData {
            origin: origin.as_str().to_string(),
            total: 100,
            conversion_rates: vec![ConversionRate {
                status: 4,
                count: 40,
                percentage: "40".to_string(),
            }],
        }
    }

    fn drain_until<F: Fn(&DashboardController) -> bool>(
        controller: &mut DashboardController,
        condition: F,
    ) {
        for _ in 0..400 {
            controller.poll_jobs();
            if condition(controller) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("condition not reached before timeout");
    }

    #[test]
    fn stale_origin_result_is_discarded() {
        let mut controller = DashboardController::new(Arc::new(ScriptedApi::all_ok()));
        controller.latest_origin_request = Some(9);
        controller.ui.origin_chart.loading = true;

        controller
            .message_tx
            .send(JobMessage::OriginLoaded {
                request_id: 3,
                result: Ok(sample_data(Origin::Wpp)),
            })
            .unwrap();
        controller.poll_jobs();

        assert!(controller.ui.origin_chart.loading);
        assert!(controller.ui.origin_chart.data.is_none());
    }

    #[test]
    fn stale_combined_error_does_not_surface() {
        let mut controller = DashboardController::new(Arc::new(ScriptedApi::all_ok()));
        controller.latest_combined_request = Some(5);
        controller.ui.combined_chart.loading = true;

        controller
            .message_tx
            .send(JobMessage::CombinedLoaded {
                request_id: 2,
                result: Err(ApiError::Http("boom".to_string())),
            })
            .unwrap();
        controller.poll_jobs();

        assert!(controller.ui.combined_chart.loading);
        assert!(controller.ui.combined_chart.error.is_none());
    }

    #[test]
    fn origin_failure_sets_generic_message_only() {
        let api = ScriptedApi::all_ok();
        api.responses.lock().unwrap().insert(
            Origin::Email,
            Err(ApiError::Http("connection refused".to_string())),
        );
        let mut controller = DashboardController::new(Arc::new(api));
        controller.refetch_origin();

        drain_until(&mut controller, |c| !c.ui.origin_chart.loading);
        let message = controller.ui.origin_chart.error.as_deref();
        assert_eq!(message, Some(ORIGIN_FETCH_ERROR));
        assert!(controller.ui.origin_chart.data.is_none());
    }

    #[test]
    fn warm_up_failures_do_not_touch_state() {
        let api = ScriptedApi::all_ok();
        api.responses
            .lock()
            .unwrap()
            .insert(Origin::Wpp, Err(ApiError::Http("down".to_string())));
        api.responses
            .lock()
            .unwrap()
            .insert(Origin::Mobile, Err(ApiError::Http("down".to_string())));
        let mut controller = DashboardController::new(Arc::new(api));
        controller.select_origin(Origin::Email);

        drain_until(&mut controller, |c| c.ui.origin_chart.data.is_some());
        assert!(controller.ui.origin_chart.error.is_none());
        assert_eq!(
            controller.ui.origin_chart.data.as_ref().unwrap().origin,
            "email"
        );
    }

    #[test]
    fn fetch_all_origins_fails_round_on_single_error() {
        let api = ScriptedApi::all_ok();
        api.responses
            .lock()
            .unwrap()
            .insert(Origin::Mobile, Err(ApiError::Http("timeout".to_string())));
        let err = fetch_all_origins(&api).unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }

    #[test]
    fn fetch_all_origins_preserves_fixed_order() {
        let api = ScriptedApi::all_ok();
        let results = fetch_all_origins(&api).unwrap();
        let origins: Vec<Origin> = results.iter().map(|(origin, _)| *origin).collect();
        assert_eq!(origins, Origin::ALL.to_vec());
    }
}
