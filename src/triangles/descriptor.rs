/// What a triangle counting run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One total for the whole graph.
    Global,
    /// One count per vertex.
    Local,
}

/// Whether the dense path renumbers vertices by descending degree before counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relabel {
    Yes,
    No,
}

/// Options of a triangle counting run.
///
/// Graphs whose average degree (`edge_count / vertex_count`) reaches
/// `average_degree_threshold` take the dense path, which calls the intersection routine;
/// the others take the sparse merge-scan path. The choice never changes the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    task: Task,
    relabel: Relabel,
    average_degree_threshold: usize,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            task: Task::Global,
            relabel: Relabel::Yes,
            average_degree_threshold: 4,
        }
    }
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_task(mut self, task: Task) -> Self {
        self.task = task;
        self
    }

    pub fn set_relabel(mut self, relabel: Relabel) -> Self {
        self.relabel = relabel;
        self
    }

    pub fn set_average_degree_threshold(mut self, threshold: usize) -> Self {
        self.average_degree_threshold = threshold;
        self
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn relabel(&self) -> Relabel {
        self.relabel
    }

    pub fn average_degree_threshold(&self) -> usize {
        self.average_degree_threshold
    }
}
