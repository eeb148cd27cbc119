//! # Portable signal names.
//!
//! [`Signal`] names the OS signals an app can register with
//! [`AppBuilder::notify_signal`](crate::AppBuilder::notify_signal). It is a plain
//! value: tests and other in-process sources deliver it through
//! [`AppHandle::send_signal`](crate::AppHandle::send_signal) without touching the
//! process signal table.

use std::fmt;

/// An operating-system signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGHUP`: terminal hangup, often "reload".
    Hangup,
    /// `SIGINT`: Ctrl-C.
    Interrupt,
    /// `SIGQUIT`.
    Quit,
    /// `SIGTERM`: default kill signal (systemd, Kubernetes).
    Terminate,
    /// `SIGUSR1`.
    User1,
    /// `SIGUSR2`.
    User2,
    /// `SIGALRM`.
    Alarm,
    /// Any other signal by number (Unix only).
    Raw(i32),
}

#[cfg(unix)]
/// Variants with a name, in declaration order.
const NAMED: [Signal; 7] = [
    Signal::Hangup,
    Signal::Interrupt,
    Signal::Quit,
    Signal::Terminate,
    Signal::User1,
    Signal::User2,
    Signal::Alarm,
];

impl Signal {
    /// Folds `Raw(n)` into the named variant for the same OS signal.
    ///
    /// `Signal::Raw(15)` and `Signal::Terminate` are one signal; the app
    /// compares signals after normalizing them.
    ///
    /// # Example
    /// ```
    /// use appvisor::Signal;
    ///
    /// # #[cfg(unix)]
    /// assert_eq!(Signal::Raw(1).normalized(), Signal::Hangup);
    /// assert_eq!(Signal::Terminate.normalized(), Signal::Terminate);
    /// ```
    pub fn normalized(self) -> Signal {
        match self {
            Signal::Raw(n) => named_for(n).unwrap_or(self),
            named => named,
        }
    }

    /// Maps to tokio's Unix signal kind.
    #[cfg(unix)]
    pub(crate) fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Signal::Hangup => SignalKind::hangup(),
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Quit => SignalKind::quit(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::User1 => SignalKind::user_defined1(),
            Signal::User2 => SignalKind::user_defined2(),
            Signal::Alarm => SignalKind::alarm(),
            Signal::Raw(n) => SignalKind::from_raw(n),
        }
    }
}

#[cfg(unix)]
fn named_for(n: i32) -> Option<Signal> {
    NAMED.into_iter().find(|s| s.kind().as_raw_value() == n)
}

#[cfg(not(unix))]
fn named_for(_n: i32) -> Option<Signal> {
    None
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hangup => f.write_str("SIGHUP"),
            Signal::Interrupt => f.write_str("SIGINT"),
            Signal::Quit => f.write_str("SIGQUIT"),
            Signal::Terminate => f.write_str("SIGTERM"),
            Signal::User1 => f.write_str("SIGUSR1"),
            Signal::User2 => f.write_str("SIGUSR2"),
            Signal::Alarm => f.write_str("SIGALRM"),
            Signal::Raw(n) => write!(f, "signal({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_conventional_names() {
        assert_eq!(Signal::Hangup.to_string(), "SIGHUP");
        assert_eq!(Signal::Terminate.to_string(), "SIGTERM");
        assert_eq!(Signal::Raw(34).to_string(), "signal(34)");
    }

    #[cfg(unix)]
    #[test]
    fn raw_numbers_match_named_kinds() {
        assert_eq!(Signal::Hangup.kind().as_raw_value(), 1);
        assert_eq!(Signal::Interrupt.kind().as_raw_value(), 2);
        assert_eq!(Signal::Terminate.kind().as_raw_value(), 15);
        assert_eq!(Signal::Raw(15).kind(), Signal::Terminate.kind());
    }

    #[cfg(unix)]
    #[test]
    fn raw_numbers_fold_into_named_variants() {
        assert_eq!(Signal::Raw(1).normalized(), Signal::Hangup);
        assert_eq!(Signal::Raw(15).normalized(), Signal::Terminate);
        assert_eq!(Signal::Raw(34).normalized(), Signal::Raw(34));
        assert_eq!(Signal::User1.normalized(), Signal::User1);
    }
}
