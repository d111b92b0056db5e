//! Recorded signal time series and export.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use sf_core::{SignalMap, Value};

use crate::error::SimResult;

/// Every recorded signal sampled at the accepted instants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    /// Time column (seconds).
    pub t: Vec<f64>,
    /// Samples per fully qualified signal name, aligned with `t`.
    pub signals: BTreeMap<String, Vec<Value>>,
}

impl History {
    /// Append one instant, skipping the names in `exclude`.
    ///
    /// A signal missing at some instant gets a NaN sample of its own width
    /// there, so every series stays aligned with `t`.
    pub fn record(&mut self, t: f64, known: &SignalMap, exclude: &BTreeSet<String>) {
        let row = self.t.len();
        self.t.push(t);
        for (name, value) in known {
            if exclude.contains(name) {
                continue;
            }
            let samples = self.signals.entry(name.clone()).or_default();
            if samples.len() < row {
                samples.resize(row, Value::filled(value.len(), f64::NAN));
            }
            samples.push(value.clone());
        }
        for samples in self.signals.values_mut() {
            if samples.len() == row {
                let width = samples.last().map_or(1, Value::len);
                samples.push(Value::filled(width, f64::NAN));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn get(&self, signal: &str) -> Option<&[Value]> {
        self.signals.get(signal).map(Vec::as_slice)
    }

    /// First element of every sample of `signal`.
    pub fn scalar_series(&self, signal: &str) -> Option<Vec<f64>> {
        self.signals
            .get(signal)
            .map(|s| s.iter().map(|v| v.first().unwrap_or(f64::NAN)).collect())
    }

    /// Last recorded sample of `signal`.
    pub fn last(&self, signal: &str) -> Option<&Value> {
        self.signals.get(signal)?.last()
    }

    /// One column per scalar element; vector signals become `name[i]`.
    pub fn write_csv<W: Write>(&self, mut w: W) -> SimResult<()> {
        let widths: Vec<(&str, usize)> = self
            .signals
            .iter()
            .map(|(name, samples)| (name.as_str(), samples.first().map_or(1, Value::len)))
            .collect();

        let mut header = vec!["t".to_string()];
        for &(name, width) in &widths {
            if width == 1 {
                header.push(name.to_owned());
            } else {
                header.extend((0..width).map(|i| format!("{name}[{i}]")));
            }
        }
        writeln!(w, "{}", header.join(","))?;

        for (row, t) in self.t.iter().enumerate() {
            let mut cells = vec![t.to_string()];
            for &(name, width) in &widths {
                let sample = self.signals.get(name).and_then(|s| s.get(row));
                for i in 0..width {
                    cells.push(
                        sample
                            .and_then(|v| v.as_slice().get(i))
                            .map_or_else(String::new, f64::to_string),
                    );
                }
            }
            writeln!(w, "{}", cells.join(","))?;
        }
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> SimResult<()> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        fs::write(path, buffer)?;
        Ok(())
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> SimResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> History {
        let mut h = History::default();
        let exclude = BTreeSet::from(["p".to_string()]);
        for k in 0..3 {
            let t = k as f64;
            let known: SignalMap = [
                ("p".to_string(), Value::scalar(9.0)),
                ("x".to_string(), Value::scalar(t)),
                ("v".to_string(), Value::from(vec![t, -t])),
            ]
            .into();
            h.record(t, &known, &exclude);
        }
        h
    }

    #[test]
    fn parameters_are_excluded() {
        let h = sample();
        assert_eq!(h.len(), 3);
        assert!(h.get("p").is_none());
        assert_eq!(h.scalar_series("x").unwrap(), [0.0, 1.0, 2.0]);
        assert_eq!(h.last("v").unwrap().as_slice(), &[2.0, -2.0]);
    }

    #[test]
    fn csv_expands_vector_columns() {
        let mut out = Vec::new();
        sample().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "t,v[0],v[1],x");
        assert_eq!(lines[2], "1,1,-1,1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn late_and_dropped_signals_stay_aligned() {
        let mut h = History::default();
        let none = BTreeSet::new();
        for k in 0..3 {
            let t = k as f64;
            let mut known: SignalMap = [("x".to_string(), Value::scalar(t))].into();
            if k > 0 {
                known.insert("late".into(), Value::scalar(100.0 + t));
            }
            if k < 2 {
                known.insert("early".into(), Value::from(vec![t, t]));
            }
            h.record(t, &known, &none);
        }

        let late = h.scalar_series("late").unwrap();
        assert!(late[0].is_nan());
        assert_eq!(&late[1..], &[101.0, 102.0]);
        let early = h.get("early").unwrap();
        assert_eq!(early.len(), 3);
        assert_eq!(early[2].len(), 2);
        assert!(early[2].iter().all(f64::is_nan));

        let mut out = Vec::new();
        h.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "t,early[0],early[1],late,x");
        assert_eq!(lines[1], "0,0,0,NaN,0");
        assert_eq!(lines[2], "1,1,1,101,1");
        assert_eq!(lines[3], "2,NaN,NaN,102,2");
    }

    #[test]
    fn json_has_time_and_signals() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["t"].as_array().unwrap().len(), 3);
        assert_eq!(json["signals"]["v"][1], serde_json::json!([1.0, -1.0]));
    }
}
