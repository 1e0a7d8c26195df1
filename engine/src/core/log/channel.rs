use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{LevelFilter, Metadata, Record};

/// One formatted log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

/// A [`log::Log`] that sends every enabled record over a channel.
///
/// ```rust,ignore
/// let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Debug);
/// logger.install()?;
///
/// world.tick(delta)?;
/// for message in receiver.try_iter() {
///     println!("{:5} {}", message.level, message.message);
/// }
/// ```
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver just means nobody is listening.
            let _ = self.sender.try_send(LogMessage {
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, level: LevelFilter) -> Self {
        Self { sender, level }
    }

    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, level), receiver)
    }

    /// Install as the global logger. Fails if a logger is already installed.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::{Level, Log};

    use super::*;

    fn record<'a>(level: Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder()
            .level(level)
            .target("sprocket_ecs::ecs::world")
            .args(args)
            .build()
    }

    #[test]
    fn forwards_enabled_records() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Debug);

        // When
        logger.log(&record(Level::Debug, format_args!("registered {}", 3)));

        // Then
        assert_eq!(
            receiver.try_recv().unwrap(),
            LogMessage {
                level: Level::Debug,
                target: "sprocket_ecs::ecs::world".to_string(),
                message: "registered 3".to_string(),
            }
        );
    }

    #[test]
    fn drops_records_above_the_filter() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Warn);

        // When
        logger.log(&record(Level::Trace, format_args!("tick")));
        logger.log(&record(Level::Warn, format_args!("failed")));

        // Then
        assert_eq!(receiver.try_iter().count(), 1);
    }

    #[test]
    fn install_sets_the_global_logger_once() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Warn);
        let (second, _) = ChannelLogger::with_receiver(LevelFilter::Warn);

        // When
        logger.install().unwrap();
        log::warn!(target: "sprocket_ecs::ecs::schedule", "system failed");

        // Then
        assert!(second.install().is_err());
        assert_eq!(log::max_level(), LevelFilter::Warn);
        assert!(
            receiver
                .try_iter()
                .any(|message| message.message == "system failed")
        );
    }

    #[test]
    fn closed_receiver_is_ignored() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Info);
        drop(receiver);

        // When / Then - Does not panic
        logger.log(&record(Level::Info, format_args!("nobody listening")));
    }
}
