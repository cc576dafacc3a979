use std::collections::HashMap;

use super::sample::{Sample, SampleParseError};
use super::tree::{FrameId, FrameNode, FrameTree};

/// Merges Austin samples into a single frame tree:
/// `root → P<pid> → T<thread> → frames…`.
///
/// Siblings are merged on their raw token and their values summed; a new
/// sibling is appended after the existing ones.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    tree: FrameTree,
    index: HashMap<(FrameId, String), FrameId>,
    samples: usize,
    height: usize,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self {
            tree: FrameTree::new_root(),
            index: HashMap::new(),
            samples: 0,
            height: 1,
        }
    }

    pub fn add(&mut self, sample: &Sample) {
        let root = self.tree.root();
        self.tree.add_value(root, sample.metric);

        let process = self.child(root, &sample.process, || {
            FrameNode::new(sample.process.clone(), sample.process.clone(), None)
        });
        self.tree.add_value(process, sample.metric);

        let mut parent = self.child(process, &sample.thread, || {
            FrameNode::new(sample.thread.clone(), sample.thread.clone(), None)
        });
        self.tree.add_value(parent, sample.metric);

        for frame in &sample.frames {
            parent = self.child(parent, &frame.raw, || {
                let mut node =
                    FrameNode::new(frame.raw.clone(), frame.function.clone(), frame.file.clone());
                node.line = frame.line;
                node
            });
            self.tree.add_value(parent, sample.metric);
        }

        self.samples += 1;
        self.height = self.height.max(sample.frames.len() + 3);
    }

    pub fn add_line(&mut self, line: &str) -> Result<(), SampleParseError> {
        let sample = Sample::parse(line)?;
        self.add(&sample);
        Ok(())
    }

    /// Number of samples merged so far.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of levels in the tree, the synthetic root included.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tree(&self) -> &FrameTree {
        &self.tree
    }

    pub fn finish(self) -> FrameTree {
        tracing::debug!(
            samples = self.samples,
            frames = self.tree.len(),
            height = self.height,
            "merged samples into frame tree"
        );
        self.tree
    }

    fn child(&mut self, parent: FrameId, key: &str, make: impl FnOnce() -> FrameNode) -> FrameId {
        if let Some(&id) = self.index.get(&(parent, key.to_string())) {
            return id;
        }
        let id = self.tree.push_child(parent, make());
        self.index.insert((parent, key.to_string()), id);
        id
    }
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a whole file of Austin samples.
///
/// Blank lines and `#` comments are ignored; malformed lines are skipped
/// with a warning. Fails only when no line yields a sample.
pub fn parse_samples(text: &str) -> Result<ProfileBuilder, SampleParseError> {
    let mut builder = ProfileBuilder::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = builder.add_line(line) {
            tracing::warn!(line = number + 1, %err, "skipping malformed sample");
        }
    }

    if builder.samples() == 0 {
        return Err(SampleParseError::Empty);
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FrameInfo;

    fn names(tree: &FrameTree, id: FrameId) -> Vec<String> {
        tree.children(id)
            .iter()
            .filter_map(|&c| tree.node(c))
            .map(|n| n.name.clone())
            .collect()
    }

    #[test]
    fn heights_follow_deepest_sample() {
        let mut builder = ProfileBuilder::new();
        builder.add_line("P123;T0:0x546745146 1042").unwrap();
        assert_eq!(builder.height(), 3);

        builder
            .add_line("P123;T0:0x546745146;foo_module.py:foo:10;bar_module.py:bar:20 1042")
            .unwrap();
        assert_eq!(builder.height(), 5);
        assert_eq!(builder.tree().height(), 5);
    }

    #[test]
    fn merging_sums_values() {
        let mut builder = ProfileBuilder::new();
        builder.add_line("P1;T1;a.py:main:1;a.py:work:5 100").unwrap();
        builder.add_line("P1;T1;a.py:main:1;a.py:work:5 50").unwrap();
        builder.add_line("P1;T1;a.py:main:1 25").unwrap();
        let tree = builder.finish();

        assert_eq!(tree.node(tree.root()).map(FrameInfo::value), Some(175));
        let work = tree.iter().find(|(_, n)| n.name == "work").unwrap().1;
        assert_eq!(work.value, 150);
        assert_eq!(work.file.as_deref(), Some("a.py"));
        assert_eq!(work.line, Some(5));
        let main = tree.iter().find(|(_, n)| n.name == "main").unwrap().1;
        assert_eq!(main.value, 175);
        // root, P1, T1, main, work
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn distinct_lines_are_distinct_frames() {
        let mut builder = ProfileBuilder::new();
        builder.add_line("P1;T1;a.py:f:1 1").unwrap();
        builder.add_line("P1;T1;a.py:f:2 1").unwrap();
        let tree = builder.finish();
        let thread = tree.iter().find(|(_, n)| n.name == "T1").unwrap().0;
        assert_eq!(names(&tree, thread), vec!["f", "f"]);
    }

    #[test]
    fn new_children_are_appended() {
        let mut builder = ProfileBuilder::new();
        builder.add_line("P1;T1;z.py:zeta:1 1").unwrap();
        builder.add_line("P1;T1;a.py:alpha:1 1").unwrap();
        builder.add_line("P1;T2;z.py:zeta:1 1").unwrap();
        let tree = builder.finish();

        let process = tree.children(tree.root())[0];
        assert_eq!(names(&tree, process), vec!["T1", "T2"]);
        let thread = tree.children(process)[0];
        assert_eq!(names(&tree, thread), vec!["zeta", "alpha"]);
    }

    #[test]
    fn process_and_thread_frames_have_no_module() {
        let mut builder = ProfileBuilder::new();
        builder.add_line("P9;T9;m.py:f:3 7").unwrap();
        let tree = builder.finish();
        let process = tree.children(tree.root())[0];
        assert_eq!(tree.node(process).and_then(FrameInfo::file), None);
    }

    #[test]
    fn parse_file_skips_bad_lines() {
        let text = "# austin\n\nP1;T1;a.py:f:1 10\nnot a sample\nP1;T1;a.py:f:1 5\n";
        let builder = parse_samples(text).unwrap();
        assert_eq!(builder.samples(), 2);
        assert_eq!(builder.tree().node(FrameId(0)).map(|n| n.value), Some(15));
    }

    #[test]
    fn parse_file_without_samples_errors() {
        assert_eq!(
            parse_samples("# only comments\n\n").err(),
            Some(SampleParseError::Empty)
        );
    }
}
