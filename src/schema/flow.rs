// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Artifact flow graph
//!
//! Derives producer/consumer edges between actions from artifact names and
//! renders the flow for inspection. The producer of an artifact is the first
//! action in document order that declares it as an output.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::schema::PipelineDef;

/// An artifact consumed by an action with no upstream producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnproducedInput {
    /// Consumer, addressed as `stage/action`
    pub action: String,
    /// Artifact name with no producer
    pub artifact: String,
}

/// Producer/consumer graph over one pipeline's actions
pub struct FlowGraph {
    graph: DiGraph<String, String>,
    unproduced: Vec<UnproducedInput>,
}

impl FlowGraph {
    /// Build the flow graph from a pipeline definition
    pub fn build(pipeline: &PipelineDef) -> Self {
        let mut graph = DiGraph::new();
        let mut producers: HashMap<&str, NodeIndex> = HashMap::new();
        let mut unproduced = Vec::new();

        for stage in &pipeline.stages {
            for action in &stage.actions {
                let label = format!("{}/{}", stage.name, action.name());
                let node = graph.add_node(label.clone());

                for artifact in action.input_artifacts() {
                    match producers.get(artifact) {
                        Some(&producer) => {
                            graph.add_edge(producer, node, artifact.to_string());
                        }
                        None => unproduced.push(UnproducedInput {
                            action: label.clone(),
                            artifact: artifact.to_string(),
                        }),
                    }
                }

                for artifact in action.output_artifacts() {
                    producers.entry(artifact).or_insert(node);
                }
            }
        }

        Self { graph, unproduced }
    }

    /// Inputs consumed without any upstream producer
    pub fn unproduced_inputs(&self) -> &[UnproducedInput] {
        &self.unproduced
    }

    /// Whether every consumed artifact has an upstream producer
    pub fn is_fully_wired(&self) -> bool {
        self.unproduced.is_empty()
    }

    /// Generate a text representation of the artifact flow
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (i, node) in self.graph.node_indices().enumerate() {
            out.push_str(&format!("{}. {}", i + 1, self.graph[node]));

            let consumed: Vec<String> = self
                .graph
                .edges_directed(node, petgraph::Direction::Incoming)
                .map(|e| {
                    use petgraph::visit::EdgeRef;
                    format!("{} <- {}", e.weight(), self.graph[e.source()])
                })
                .collect();

            if !consumed.is_empty() {
                out.push_str(&format!(" [{}]", consumed.join(", ")));
            }

            out.push('\n');
        }

        out
    }

    /// Generate a DOT diagram of the artifact flow
    pub fn to_dot(&self) -> String {
        use petgraph::visit::EdgeRef;

        let mut out = String::from("digraph artifacts {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                self.graph[edge.source()],
                self.graph[edge.target()],
                edge.weight()
            ));
        }

        // Isolated actions still appear
        for node in self.graph.node_indices() {
            if self.graph.neighbors_undirected(node).count() == 0 {
                out.push_str(&format!("    \"{}\";\n", self.graph[node]));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Generate a Mermaid diagram of the artifact flow
    pub fn to_mermaid(&self) -> String {
        use petgraph::visit::EdgeRef;

        let mut out = String::from("graph TD\n");

        for node in self.graph.node_indices() {
            out.push_str(&format!("    n{}[\"{}\"]\n", node.index(), self.graph[node]));
        }

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    n{} -->|{}| n{}\n",
                edge.source().index(),
                edge.weight(),
                edge.target().index()
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Manifest;

    fn demo_pipeline(yaml: &str) -> PipelineDef {
        Manifest::from_yaml(yaml).unwrap().pipelines.remove(0)
    }

    const WIRED: &str = r#"
pipelines:
  - name: demo
    stages:
      - name: Source
        actions:
          - name: pull
            type: SOURCE_REPO
            repository: app
            output: src
      - name: Build
        actions:
          - name: compile
            type: BUILD
            input: src
            outputs: [built]
      - name: Deploy
        actions:
          - name: release
            type: DEPLOY_STACK
            mode: CREATE_UPDATE
            stack_name: app
            input: built
"#;

    #[test]
    fn test_fully_wired_flow() {
        let pipeline = demo_pipeline(WIRED);
        let flow = FlowGraph::build(&pipeline);

        assert!(flow.is_fully_wired());

        let text = flow.to_text();
        assert!(text.contains("Source/pull"));
        assert!(text.contains("built <- Build/compile"));
    }

    #[test]
    fn test_unproduced_input_reported() {
        let pipeline = demo_pipeline(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Build
        actions:
          - name: compile
            type: BUILD
            input: ghost
"#,
        );
        let flow = FlowGraph::build(&pipeline);

        assert_eq!(
            flow.unproduced_inputs(),
            &[UnproducedInput {
                action: "Build/compile".into(),
                artifact: "ghost".into(),
            }]
        );
    }

    #[test]
    fn test_consumer_before_producer_is_unproduced() {
        let pipeline = demo_pipeline(
            r#"
pipelines:
  - name: demo
    stages:
      - name: Build
        actions:
          - name: compile
            type: BUILD
            input: src
      - name: Source
        actions:
          - name: pull
            type: SOURCE_REPO
            repository: app
            output: src
"#,
        );
        let flow = FlowGraph::build(&pipeline);
        assert!(!flow.is_fully_wired());
    }

    #[test]
    fn test_dot_and_mermaid_output() {
        let pipeline = demo_pipeline(WIRED);
        let flow = FlowGraph::build(&pipeline);

        let dot = flow.to_dot();
        assert!(dot.contains("digraph artifacts"));
        assert!(dot.contains("\"Source/pull\" -> \"Build/compile\" [label=\"src\"]"));

        let mermaid = flow.to_mermaid();
        assert!(mermaid.contains("graph TD"));
        assert!(mermaid.contains("-->|src|"));
    }
}
