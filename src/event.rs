use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

/// How often a redraw is offered so status messages can expire.
const RENDER_EVERY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// One scheduler period elapsed.
    Tick,
    /// Redraw only, for expiring status messages.
    Render,
    Resize,
}

/// Terminal input the app loop cares about. Focus and paste are dropped.
pub fn from_terminal(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}

/// Single channel for terminal input and scheduler ticks, so the app loop
/// handles each one to completion before the next.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// The first `Tick` arrives one full period after startup; the app has
    /// already collected once while being built.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let task = tokio::spawn(pump(tx, tick_rate));
        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn pump(tx: UnboundedSender<Event>, tick_rate: Duration) {
    let mut reader = EventStream::new();
    let mut ticks = interval_at(Instant::now() + tick_rate, tick_rate);
    // A slow tick pushes the schedule back instead of bursting to catch up.
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut renders = interval(RENDER_EVERY);

    loop {
        let next = tokio::select! {
            input = reader.next() => match input {
                Some(Ok(raw)) => from_terminal(raw),
                Some(Err(err)) => {
                    tracing::error!(error = %err, "terminal event stream failed");
                    return;
                }
                None => return,
            },
            _ = ticks.tick() => Some(Event::Tick),
            _ = renders.tick() => Some(Event::Render),
        };

        if let Some(event) = next
            && tx.send(event).is_err()
        {
            tracing::debug!("event receiver dropped, stopping event task");
            return;
        }
    }
}
