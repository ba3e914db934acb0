use crate::controller::Controller;
use crate::display::Display;
use crate::prompt::Prompt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wallpaper_source::ImageSource;

/// Re-runs [`Controller::check_and_update`] every `period` until stopped.
///
/// The first check happens one full period after `start`; callers run the
/// initial check themselves. Dropping the timer stops it.
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    pub fn start<R, D, P>(controller: Arc<Controller<R, D, P>>, period: Duration) -> Self
    where
        R: ImageSource + 'static,
        D: Display + 'static,
        P: Prompt + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                log::debug!("Periodic wallpaper check");
                let state = controller.check_and_update().await;
                log::debug!("Periodic check finished: {:?}", state);
            }
        });
        log::info!("Wallpaper refresh every {}s", period.as_secs());
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::info!("Wallpaper refresh stopped");
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
