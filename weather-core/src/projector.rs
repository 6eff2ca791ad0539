use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::{model::WeatherResponse, repository::FetchError, usecase::FetchForecast};

/// Shown when a failure carries no description.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    Success(WeatherResponse),
    Error(String),
}

impl UiState {
    pub fn from_result(result: Result<WeatherResponse, FetchError>) -> Self {
        match result {
            Ok(data) => UiState::Success(data),
            Err(e) if e.message().trim().is_empty() => {
                UiState::Error(FALLBACK_ERROR_MESSAGE.to_string())
            }
            Err(e) => UiState::Error(e.message().to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }
}

/// Holds the current [`UiState`] and starts fetches.
///
/// Every fetch runs on its own task and none is cancelled by a later one, so when
/// fetches overlap the state ends up with whichever finished last.
pub struct WeatherProjector {
    fetch: Arc<dyn FetchForecast>,
    state: Arc<watch::Sender<UiState>>,
}

impl WeatherProjector {
    /// Starts in `Loading` and kicks off the first fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(fetch: Arc<dyn FetchForecast>) -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        let projector = Self { fetch, state: Arc::new(state) };
        projector.retry();
        projector
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Observers are woken on every change of variant or payload.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Switches to `Loading` right away, then fetches in the background.
    pub fn fetch_weather(&self) -> JoinHandle<()> {
        publish(&self.state, UiState::Loading);

        let fetch = Arc::clone(&self.fetch);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let next = UiState::from_result(fetch.call().await);
            match &next {
                UiState::Success(data) => log::debug!("Forecast loaded for {}", data.location.name),
                UiState::Error(message) => log::debug!("Forecast failed: {message}"),
                UiState::Loading => {}
            }
            publish(&state, next);
        })
    }

    pub fn retry(&self) {
        // detached; completion is observed through `subscribe`
        drop(self.fetch_weather());
    }
}

fn publish(state: &watch::Sender<UiState>, next: UiState) {
    state.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Current, Forecast, Location};
    use async_trait::async_trait;
    use tokio::sync::{mpsc, oneshot};

    type Reply = oneshot::Sender<Result<WeatherResponse, FetchError>>;

    /// Each call hands a reply slot to the test and waits on it.
    struct ScriptedFetch {
        calls: mpsc::UnboundedSender<Reply>,
    }

    #[async_trait]
    impl FetchForecast for ScriptedFetch {
        async fn call(&self) -> Result<WeatherResponse, FetchError> {
            let (tx, rx) = oneshot::channel();
            self.calls.send(tx).expect("test dropped the call receiver");
            rx.await.unwrap_or_else(|_| Err(FetchError::new("reply dropped")))
        }
    }

    struct FixedFetch(Result<WeatherResponse, FetchError>);

    #[async_trait]
    impl FetchForecast for FixedFetch {
        async fn call(&self) -> Result<WeatherResponse, FetchError> {
            self.0.clone()
        }
    }

    fn scripted() -> (WeatherProjector, mpsc::UnboundedReceiver<Reply>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (WeatherProjector::new(Arc::new(ScriptedFetch { calls: tx })), rx)
    }

    fn response(name: &str) -> WeatherResponse {
        WeatherResponse {
            location: Location { name: name.into() },
            current: Current {
                temp_c: 10.0,
                condition: Condition { text: "Cloudy".into(), icon: "//x/119.png".into() },
            },
            forecast: Forecast { forecast_day: vec![] },
        }
    }

    async fn settled(projector: &WeatherProjector) -> UiState {
        let mut rx = projector.subscribe();
        rx.wait_for(|s| !s.is_loading()).await.expect("sender alive").clone()
    }

    #[tokio::test]
    async fn starts_in_loading_and_fetches_once() {
        let (projector, mut calls) = scripted();

        assert_eq!(projector.state(), UiState::Loading);

        let reply = calls.recv().await.expect("initial fetch");
        assert!(calls.try_recv().is_err());
        assert_eq!(projector.state(), UiState::Loading);
        drop(reply);
    }

    #[tokio::test]
    async fn success_is_published() {
        let projector = WeatherProjector::new(Arc::new(FixedFetch(Ok(response("Oslo")))));

        assert_eq!(settled(&projector).await, UiState::Success(response("Oslo")));
    }

    #[tokio::test]
    async fn failure_message_is_published() {
        let projector = WeatherProjector::new(Arc::new(FixedFetch(Err(FetchError::new("timeout")))));

        assert_eq!(settled(&projector).await, UiState::Error("timeout".into()));
    }

    #[tokio::test]
    async fn empty_failure_message_uses_fallback() {
        let projector = WeatherProjector::new(Arc::new(FixedFetch(Err(FetchError::new("")))));

        assert_eq!(settled(&projector).await, UiState::Error(FALLBACK_ERROR_MESSAGE.into()));
    }

    #[tokio::test]
    async fn fetch_weather_resets_to_loading_synchronously() {
        let (projector, mut calls) = scripted();

        calls.recv().await.unwrap().send(Err(FetchError::new("down"))).unwrap();
        assert_eq!(settled(&projector).await, UiState::Error("down".into()));

        let retry = projector.fetch_weather();
        assert_eq!(projector.state(), UiState::Loading);

        calls.recv().await.unwrap().send(Ok(response("Rome"))).unwrap();
        retry.await.unwrap();
        assert_eq!(projector.state(), UiState::Success(response("Rome")));
    }

    #[tokio::test]
    async fn success_is_replaced_by_error_on_refetch() {
        let (projector, mut calls) = scripted();

        calls.recv().await.unwrap().send(Ok(response("Rome"))).unwrap();
        assert!(matches!(settled(&projector).await, UiState::Success(_)));

        let refetch = projector.fetch_weather();
        calls.recv().await.unwrap().send(Err(FetchError::new("HTTP 500"))).unwrap();
        refetch.await.unwrap();

        assert_eq!(projector.state(), UiState::Error("HTTP 500".into()));
    }

    #[tokio::test]
    async fn overlapping_fetches_last_completion_wins() {
        let (projector, mut calls) = scripted();
        let first = calls.recv().await.unwrap();

        let second_handle = projector.fetch_weather();
        let second = calls.recv().await.unwrap();

        second.send(Err(FetchError::new("second"))).unwrap();
        second_handle.await.unwrap();
        assert_eq!(projector.state(), UiState::Error("second".into()));

        first.send(Ok(response("First"))).unwrap();
        assert_eq!(settled_success(&projector).await, response("First"));
    }

    async fn settled_success(projector: &WeatherProjector) -> WeatherResponse {
        let mut rx = projector.subscribe();
        let state = rx.wait_for(|s| matches!(s, UiState::Success(_))).await.unwrap().clone();
        match state {
            UiState::Success(data) => data,
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn observers_are_notified_only_on_change() {
        let (projector, mut calls) = scripted();
        let mut rx = projector.subscribe();

        // already Loading, so no notification
        let handle = projector.fetch_weather();
        assert!(!rx.has_changed().unwrap());

        calls.recv().await.unwrap().send(Err(FetchError::new("x"))).unwrap();
        calls.recv().await.unwrap().send(Err(FetchError::new("x"))).unwrap();
        handle.await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), UiState::Error("x".into()));
    }
}
