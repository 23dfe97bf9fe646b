use horizon::{AngleTable, Azimuth, HorizonError, NodeId, NodeSink, C};
use indicatif::{ProgressBar, ProgressStyle};

pub fn bar(header: String, length: u64) -> ProgressBar {
    let pb = ProgressBar::hidden();
    pb.set_prefix(header);
    pb.set_length(length);
    pb.set_style(
        ProgressStyle::with_template("{prefix}...\n[{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .expect("incorrect progress bar format string")
            .progress_chars("#>-"),
    );
    pb
}

/// Collects node angles into a table, ticking `bar` on every node.
pub struct ProgressSink<'a> {
    pub table: &'a AngleTable,
    pub bar: &'a ProgressBar,
}

impl NodeSink for ProgressSink<'_> {
    fn write_node(&self, id: NodeId, angles: &[(Azimuth, C)]) -> Result<(), HorizonError> {
        self.table.write_node(id, angles)?;
        self.bar.inc(1);
        Ok(())
    }
}
