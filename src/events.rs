use crate::config;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use nix::sys::signal::{SigSet, Signal};
use unsegen::input::Input;

use config::Config;

pub enum Event {
    Input(Input),
    Update,
    Signal(Signal),
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: thread::JoinHandle<()>,
    _signal_handle: Option<thread::JoinHandle<()>>,
}

impl Dispatcher {
    /// `signals` are blocked on the calling thread (and so on every thread
    /// spawned from it afterwards) and delivered as `Event::Signal` instead.
    /// Call this before spawning any other thread.
    pub fn from_config(config: &Config, signals: SigSet) -> Dispatcher {
        let tick_rate = config.tick_rate();
        let (tx, rx) = mpsc::channel();

        let signal_handle = Self::spawn_signal_thread(signals, tx.clone());

        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                let stdin = stdin.lock();
                for evt in Input::read_all(stdin) {
                    match evt {
                        Ok(key) => {
                            if let Err(_) = tx.send(Event::Input(key)) {
                                return;
                            }
                        }
                        Err(e) => log::warn!("Could not read input: {}", e),
                    }
                }
            })
        };

        let update_handle = Self::spawn_update_thread(tick_rate, tx);

        Dispatcher {
            rx,
            _input_handle: input_handle,
            _update_handle: update_handle,
            _signal_handle: signal_handle,
        }
    }

    fn spawn_update_thread(tick_rate: Duration, tx: mpsc::Sender<Event>) -> thread::JoinHandle<()> {
        thread::spawn(move || loop {
            if tx.send(Event::Update).is_err() {
                return;
            }
            thread::sleep(tick_rate);
        })
    }

    fn spawn_signal_thread(
        signals: SigSet,
        tx: mpsc::Sender<Event>,
    ) -> Option<thread::JoinHandle<()>> {
        if signals.iter().next().is_none() {
            return None;
        }

        if let Err(e) = signals.thread_block() {
            log::error!("Could not block signals: {}", e);
            return None;
        }

        Some(thread::spawn(move || loop {
            match signals.wait() {
                Ok(signal) => {
                    if tx.send(Event::Signal(signal)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("Waiting for signals failed: {}", e);
                    return;
                }
            }
        }))
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
