//! Event Logger
//!
//! Append-only JSONL log of engine notifications.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use vitals_events::{generate_event_id, AgentId, EventRecord, VitalsEvent};

/// Writes one [`EventRecord`] per line
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a logger that discards events (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Generate the next event ID
    pub fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Get the current event count
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log one event at simulation time `time`
    pub fn log(&mut self, time: f32, agent: Option<&AgentId>, event: VitalsEvent) -> std::io::Result<()> {
        let record = EventRecord::new(self.next_id(), time, agent.cloned(), event);
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = record.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Log multiple events for the same agent and time
    pub fn log_batch(
        &mut self,
        time: f32,
        agent: Option<&AgentId>,
        events: impl IntoIterator<Item = VitalsEvent>,
    ) -> std::io::Result<()> {
        for event in events {
            self.log(time, agent, event)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush event logger: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;
    use vitals_events::StatType;

    #[test]
    fn test_event_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut logger = EventLogger::new(&path).unwrap();
        let agent = AgentId::new("agent_0001");
        logger
            .log(
                10.0,
                Some(&agent),
                VitalsEvent::StatChanged {
                    stat: StatType::Food,
                    value: 99.0,
                },
            )
            .unwrap();
        logger
            .log(11.0, None, VitalsEvent::GlobalTemperatureChanged { value: 50.5 })
            .unwrap();
        logger.flush().unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let first = EventRecord::from_jsonl(&lines[0]).unwrap();
        assert_eq!(first.event_id, "evt_00000001");
        assert_eq!(first.agent, Some(agent));
        let second = EventRecord::from_jsonl(&lines[1]).unwrap();
        assert_eq!(second.agent, None);
        assert_eq!(second.time, 11.0);
    }

    #[test]
    fn test_null_logger() {
        let mut logger = EventLogger::null();
        logger
            .log_batch(
                1.0,
                None,
                vec![
                    VitalsEvent::GlobalTemperatureChanged { value: 50.0 },
                    VitalsEvent::GlobalEnvironmentChanged { value: 50.0 },
                ],
            )
            .unwrap();
        assert_eq!(logger.event_count(), 2);
    }

    #[test]
    fn test_event_id_generation() {
        let mut logger = EventLogger::null();

        assert_eq!(logger.next_id(), "evt_00000001");
        assert_eq!(logger.next_id(), "evt_00000002");
        assert_eq!(logger.next_id(), "evt_00000003");
    }
}
