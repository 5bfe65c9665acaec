use super::*;
use crate::action_id::ActionId;
use memchr::{memchr, memchr_iter};
use raidsim_types::ResourceType;
use rayon::prelude::*;
use std::sync::Arc;


macro_rules! parse_f64 {
    ($s:expr) => {
        $s.trim().parse::<f64>().unwrap_or_default()
    };
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogParser;

impl LogParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses the whole log text, keeping line order.
    ///
    /// Lines without a `[time] [source]` prefix are skipped.
    pub fn parse_all(&self, text: &str) -> Vec<Arc<SimLog>> {
        let bytes = text.as_bytes();

        // Find all line boundaries, empty lines included so indices stay line numbers
        let mut line_ranges: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        for end in memchr_iter(b'\n', bytes) {
            line_ranges.push((start, end));
            start = end + 1;
        }
        if start < bytes.len() {
            line_ranges.push((start, bytes.len()));
        }

        line_ranges
            .par_iter()
            .enumerate()
            .filter_map(|(idx, &(start, end))| {
                let line = text[start..end].trim_end_matches('\r');
                if line.trim().is_empty() {
                    return None;
                }
                match self.parse_line(idx as u64 + 1, line) {
                    Ok(log) => Some(Arc::new(log)),
                    Err(err) => {
                        tracing::trace!(error = %err, "Skipping log line");
                        None
                    }
                }
            })
            .collect()
    }

    pub fn parse_line(&self, line_number: u64, line: &str) -> Result<SimLog, ParseError> {
        let b = line.as_bytes();

        let (time_start, time_end) = Self::bracket_segment(b, 0)
            .ok_or(ParseError::MissingTimestamp { line_number })?;
        let time_segment = &line[time_start..time_end];
        let timestamp = time_segment
            .trim()
            .trim_end_matches('s')
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidTimestamp {
                line_number,
                segment: time_segment.to_string(),
            })?;

        let (source_start, source_end) = Self::bracket_segment(b, time_end + 1)
            .ok_or(ParseError::MissingSource { line_number })?;
        let source = Entity::from_label(&line[source_start..source_end]);

        let message = line[source_end + 1..].trim();
        let (target, kind) = Self::parse_message(message);

        Ok(SimLog {
            line_number,
            timestamp,
            source,
            target,
            kind,
            raw: line.to_string(),
        })
    }

    /// Byte range inside the next `[...]` at or after `from`. Only whitespace
    /// may precede the opening bracket.
    fn bracket_segment(b: &[u8], from: usize) -> Option<(usize, usize)> {
        let rest = b.get(from..)?;
        let open = memchr(b'[', rest)?;
        if !rest[..open].iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        let close = memchr(b']', &rest[open..])?;
        Some((from + open + 1, from + open + close))
    }

    fn parse_message(message: &str) -> (Option<Entity>, LogKind) {
        if message.starts_with('[') {
            if let Some((target, kind)) = Self::parse_damage(message) {
                return (Some(target), kind);
            }
            return (None, LogKind::Other);
        }

        let kind = if let Some(rest) = message.strip_prefix("Casting ") {
            Self::parse_cast_began(rest)
        } else if let Some(rest) = message.strip_prefix("Completed cast ") {
            Some(LogKind::CastCompleted {
                action_id: ActionId::from_log_string(rest),
            })
        } else if let Some(rest) = message.strip_prefix("Aura gained: ") {
            Some(LogKind::AuraGained {
                action_id: ActionId::from_log_string(rest),
            })
        } else if let Some(rest) = message.strip_prefix("Aura faded: ") {
            Some(LogKind::AuraFaded {
                action_id: ActionId::from_log_string(rest),
            })
        } else if let Some(rest) = message.strip_prefix("Major cooldown used: ") {
            Some(LogKind::MajorCooldownUsed {
                action_id: ActionId::from_log_string(rest),
            })
        } else if let Some(rest) = message.strip_prefix("Gained ") {
            Self::parse_resource(rest, false)
        } else if let Some(rest) = message.strip_prefix("Spent ") {
            Self::parse_resource(rest, true)
        } else {
            None
        };

        (None, kind.unwrap_or(LogKind::Other))
    }

    // <id> (Cost = <f>, Cast Time = <dur>, Effective Time = <dur>)
    fn parse_cast_began(rest: &str) -> Option<LogKind> {
        let action_id = ActionId::from_log_string(rest);
        let paren = memchr(b'(', rest.as_bytes())?;
        let details = rest[paren + 1..].trim_end_matches(')');

        let mut cost = 0.0;
        let mut cast_time = 0.0;
        let mut effective_time = 0.0;
        for part in details.split(", ") {
            let Some((key, value)) = part.split_once(" = ") else {
                continue;
            };
            let value = value.trim().trim_end_matches('s');
            match key.trim() {
                "Cost" => cost = parse_f64!(value),
                "Cast Time" => cast_time = parse_f64!(value),
                "Effective Time" => effective_time = parse_f64!(value),
                _ => {}
            }
        }

        Some(LogKind::CastBegan {
            action_id,
            cost,
            cast_time,
            effective_time,
        })
    }

    // [<target>] <id> [tick ]<Outcome> for <f> damage. (Threat: <f>)
    fn parse_damage(message: &str) -> Option<(Entity, LogKind)> {
        let b = message.as_bytes();
        let close = memchr(b']', b)?;
        let target = Entity::from_label(&message[1..close])?;

        let rest = message[close + 1..].trim_start();
        let token_end = memchr(b'}', rest.as_bytes())?;
        let action_id = ActionId::from_log_string(&rest[..=token_end]);
        let rest = rest[token_end + 1..].trim_start();

        let (is_tick, rest) = match rest.strip_prefix("tick ") {
            Some(r) => (true, r),
            None => (false, rest),
        };
        let (outcome_word, rest) = rest.split_once(" for ")?;
        let outcome = HitOutcome::from_word(outcome_word.trim())?;
        let (amount, rest) = rest.split_once(" damage")?;

        let threat = match rest.find("(Threat: ") {
            Some(pos) => {
                let value = &rest[pos + "(Threat: ".len()..];
                parse_f64!(value.trim_end_matches(')'))
            }
            None => 0.0,
        };

        Some((
            target,
            LogKind::DamageDealt {
                action_id,
                outcome,
                is_tick,
                amount: parse_f64!(amount),
                threat,
            },
        ))
    }

    // <f> <resource> from <id> (<f> --> <f>)
    fn parse_resource(rest: &str, is_spend: bool) -> Option<LogKind> {
        let (amount, rest) = rest.split_once(' ')?;
        let (resource_name, rest) = rest.split_once(" from ")?;
        let resource_type = ResourceType::from_log_name(resource_name.trim())?;
        let action_id = ActionId::from_log_string(rest);

        let (value_before, value_after) = match memchr(b'(', rest.as_bytes()) {
            Some(paren) => {
                let values = rest[paren + 1..].trim_end_matches(')');
                let (before, after) = values.split_once("-->")?;
                (parse_f64!(before), parse_f64!(after))
            }
            None => (0.0, 0.0),
        };

        Some(LogKind::ResourceChanged {
            action_id,
            resource_type,
            is_spend,
            amount: parse_f64!(amount),
            value_before,
            value_after,
        })
    }
}
