//! Voice input driven by recognizer transcripts.
//!
//! [`TranscriptVoice`] implements [`VoiceInput`] over text: whatever produces
//! transcripts (a speech engine, or the terminal in the CLI) calls
//! [`TranscriptVoice::hear`] with partial and final results. A listening
//! session ends on the first final result, on timeout, or on
//! [`VoiceInput::stop_listening`], and delivers at most one number.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use flashdrill_core::error::VoiceError;
use flashdrill_core::traits::{NumberSink, VoiceInput};

use crate::transcript::extract_number;

/// How long a listening session waits before finalizing its transcript.
pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_millis(2300);

#[derive(Default)]
struct ListenState {
    sink: Option<NumberSink>,
    transcript: String,
    status: Option<String>,
    /// Bumped on every start/stop so stale timeouts can tell they are stale.
    session: u64,
}

/// Transcript-fed voice input with a listening timeout.
pub struct TranscriptVoice {
    state: Arc<Mutex<ListenState>>,
    timeout: Duration,
    authorized: bool,
}

impl TranscriptVoice {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ListenState::default())),
            timeout,
            authorized: true,
        }
    }

    /// A recognizer whose permission was denied.
    pub fn unauthorized() -> Self {
        Self {
            authorized: false,
            ..Self::new(DEFAULT_LISTEN_TIMEOUT)
        }
    }

    /// Feed a recognizer result. Final results end the session.
    pub fn hear(&self, text: &str, is_final: bool) {
        let mut state = lock(&self.state);
        if state.sink.is_none() {
            tracing::debug!(text, "transcript ignored: not listening");
            return;
        }
        state.transcript = text.to_string();
        if is_final {
            finalize(&mut state);
        }
    }

    /// Report a recognizer failure; the session ends without a number.
    pub fn fail(&self, message: &str) {
        let mut state = lock(&self.state);
        let err = VoiceError::Recognition(message.to_string());
        tracing::warn!("{err}");
        state.status = Some(err.to_string());
        end_session(&mut state);
    }

    /// The number the partial transcript currently reads as, for display.
    pub fn recognized_number(&self) -> Option<i64> {
        extract_number(&lock(&self.state).transcript)
    }

    /// Forget the transcript and status message.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.transcript.clear();
        state.status = None;
    }
}

impl Default for TranscriptVoice {
    fn default() -> Self {
        Self::new(DEFAULT_LISTEN_TIMEOUT)
    }
}

impl VoiceInput for TranscriptVoice {
    fn start_listening(&self, sink: NumberSink) -> Result<(), VoiceError> {
        let mut state = lock(&self.state);
        if !self.authorized {
            state.status = Some(VoiceError::NotAuthorized.to_string());
            return Err(VoiceError::NotAuthorized);
        }
        if state.sink.is_some() {
            return Err(VoiceError::AlreadyListening);
        }

        state.session += 1;
        state.sink = Some(sink);
        state.transcript.clear();
        state.status = None;
        let session = state.session;
        drop(state);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let shared = Arc::clone(&self.state);
                let timeout = self.timeout;
                handle.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    let mut state = lock(&shared);
                    if state.session == session && state.sink.is_some() {
                        tracing::debug!(?timeout, "listening timed out");
                        finalize(&mut state);
                    }
                });
            }
            Err(_) => tracing::debug!("no runtime; listening has no timeout"),
        }
        tracing::debug!(session, "listening started");
        Ok(())
    }

    fn stop_listening(&self) {
        let mut state = lock(&self.state);
        if state.sink.is_some() {
            tracing::debug!(session = state.session, "listening stopped");
        }
        end_session(&mut state);
    }

    fn is_listening(&self) -> bool {
        lock(&self.state).sink.is_some()
    }

    fn partial_transcript(&self) -> String {
        lock(&self.state).transcript.clone()
    }

    fn status_message(&self) -> Option<String> {
        lock(&self.state).status.clone()
    }
}

fn lock(state: &Mutex<ListenState>) -> MutexGuard<'_, ListenState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn end_session(state: &mut ListenState) {
    state.sink = None;
    state.session += 1;
}

/// Deliver the transcript's number, or record why there is none.
fn finalize(state: &mut ListenState) {
    let Some(sink) = state.sink.take() else {
        return;
    };
    match extract_number(&state.transcript) {
        Some(number) => {
            if sink.send(number).is_err() {
                tracing::debug!(number, "recognized number dropped: receiver gone");
            }
        }
        None => {
            let err = VoiceError::NoNumber(state.transcript.clone());
            tracing::debug!("{err}");
            state.status = Some(err.to_string());
        }
    }
    state.session += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn final_result_delivers_immediately() {
        let voice = TranscriptVoice::default();
        let (tx, rx) = oneshot::channel();
        voice.start_listening(tx).unwrap();
        assert!(voice.is_listening());

        voice.hear("fifty", false);
        assert_eq!(voice.recognized_number(), Some(50));
        voice.hear("fifty six", true);

        assert_eq!(rx.await.unwrap(), 56);
        assert!(!voice.is_listening());
        assert_eq!(voice.partial_transcript(), "fifty six");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_finalizes_partial_transcript() {
        let voice = TranscriptVoice::default();
        let (tx, rx) = oneshot::channel();
        voice.start_listening(tx).unwrap();
        voice.hear("twenty three", false);

        tokio::time::sleep(Duration::from_millis(2200)).await;
        assert!(voice.is_listening());

        assert_eq!(rx.await.unwrap(), 23);
        assert!(!voice.is_listening());
    }

    #[tokio::test]
    async fn no_number_sets_status() {
        let voice = TranscriptVoice::default();
        let (tx, rx) = oneshot::channel();
        voice.start_listening(tx).unwrap();
        voice.hear("banana", true);

        assert!(rx.await.is_err());
        let status = voice.status_message().unwrap();
        assert!(status.contains("no valid number found"), "{status}");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_timeout() {
        let voice = TranscriptVoice::default();
        let (tx, rx) = oneshot::channel();
        voice.start_listening(tx).unwrap();
        voice.hear("7", false);
        voice.stop_listening();
        assert!(rx.await.is_err());

        // A new session is not finalized by the old timer.
        let (tx, mut rx) = oneshot::channel();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        voice.start_listening(tx).unwrap();
        voice.hear("9", false);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(voice.is_listening());
        assert!(rx.try_recv().is_err());
        voice.stop_listening();
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let voice = TranscriptVoice::default();
        let (tx1, _rx1) = oneshot::channel();
        let (tx2, _rx2) = oneshot::channel();
        voice.start_listening(tx1).unwrap();
        assert_eq!(voice.start_listening(tx2), Err(VoiceError::AlreadyListening));
    }

    #[test]
    fn unauthorized_reports_status() {
        let voice = TranscriptVoice::unauthorized();
        let (tx, _rx) = oneshot::channel();
        assert_eq!(voice.start_listening(tx), Err(VoiceError::NotAuthorized));
        assert_eq!(
            voice.status_message().as_deref(),
            Some("speech recognition not authorized")
        );
        assert!(!voice.is_listening());
    }

    #[tokio::test]
    async fn recognizer_failure_ends_session() {
        let voice = TranscriptVoice::default();
        let (tx, rx) = oneshot::channel();
        voice.start_listening(tx).unwrap();
        voice.fail("microphone unavailable");
        assert!(rx.await.is_err());
        assert!(voice.status_message().unwrap().contains("microphone"));
        voice.clear();
        assert_eq!(voice.status_message(), None);
    }

    #[test]
    fn transcripts_outside_a_session_are_ignored() {
        let voice = TranscriptVoice::default();
        voice.hear("42", true);
        assert_eq!(voice.partial_transcript(), "");
    }
}
