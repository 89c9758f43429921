// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::Write;
use std::sync::Mutex;

use csv::Writer;

/// Statistics for one iteration of the iterative deepening driver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Fingerprint of the root position, in hex.
    pub position: String,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed_ms: u64,

    pub best_move: Option<String>,
    pub search_score: Option<f32>,
    pub retained: bool,

    pub completed: usize,
    pub abandoned: usize,
    pub failed: usize,

    pub tt_hits: u64,
    pub tt_misses: u64,
}

pub trait DataRecorder {
    fn record(&self, rec: &Record);
}

pub struct NullDataRecorder;

impl DataRecorder for NullDataRecorder {
    fn record(&self, _rec: &Record) {}
}

pub struct CsvDataRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvDataRecorder<W> {
    pub fn new(writer: W) -> CsvDataRecorder<W> {
        CsvDataRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        let writer = self.writer.into_inner().ok()?;
        writer.into_inner().ok()
    }
}

impl<W: Write> DataRecorder for CsvDataRecorder<W> {
    fn record(&self, rec: &Record) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writer.serialize(rec) {
            warn!("failed to record search data: {}", err);
            return;
        }

        if let Err(err) = writer.flush() {
            warn!("failed to flush search data: {}", err);
        }
    }
}
