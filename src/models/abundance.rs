use serde::{Deserialize, Serialize};

/// Species counts observed in one plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbundanceRow {
    pub plot_id: u32,
    /// One count per species column of the owning table, zeros included
    pub counts: Vec<u64>,
}

impl AbundanceRow {
    /// Number of individuals counted in the plot.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of species with a non-zero count.
    pub fn richness(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

/// Plot-by-species abundance matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbundanceTable {
    /// Species column labels, sorted
    pub species: Vec<String>,
    pub rows: Vec<AbundanceRow>,
}

impl AbundanceTable {
    pub fn num_plots(&self) -> usize {
        self.rows.len()
    }

    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    pub fn row(&self, plot_id: u32) -> Option<&AbundanceRow> {
        self.rows.iter().find(|r| r.plot_id == plot_id)
    }

    /// Total individuals per species across all plots.
    pub fn species_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.species.len()];
        for row in &self.rows {
            for (total, count) in totals.iter_mut().zip(&row.counts) {
                *total += count;
            }
        }
        totals
    }

    /// Total individuals across all plots.
    pub fn total_individuals(&self) -> u64 {
        self.rows.iter().map(AbundanceRow::total).sum()
    }
}
