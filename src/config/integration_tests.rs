#[cfg(test)]
mod integration_tests {
    use crate::config::{load_and_validate_graph, validate_graph, Graph, NodeSpec};
    use crate::errors::{ConfigError, ValidationError};

    /// The shipped linear pipeline loads, validates, and keeps document order
    #[test]
    fn test_num_pipeline_yaml_loading() {
        let graph = load_and_validate_graph("configs/num-pipeline.yaml").unwrap();

        let names: Vec<&str> = graph.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["numbers", "double", "printer"]);

        let double = graph.get("double").unwrap();
        assert_eq!(double.module, "transform/multiply");
        assert_eq!(double.parent, vec!["numbers"]);
        assert_eq!(double.queue_size, 16);
        assert_eq!(double.parallels, 2);

        assert_eq!(graph.entry_points().0, vec!["numbers"]);
    }

    /// Omitted parent, queueSize and parallels fall back to defaults
    #[test]
    fn test_fan_in_yaml_loading() {
        let graph = load_and_validate_graph("configs/fan-in.yaml").unwrap();

        assert_eq!(graph.len(), 6);
        assert_eq!(graph.entry_points().0, vec!["low", "high", "heartbeat"]);

        let heartbeat = graph.get("heartbeat").unwrap();
        assert!(heartbeat.is_root());
        assert_eq!(heartbeat.queue_size, 1);
        assert_eq!(heartbeat.parallels, 1);

        let dependents = graph.dependency_graph();
        assert_eq!(dependents.get_dependents("low"), ["triple".to_string()]);
        assert_eq!(dependents.get_dependents("high"), ["triple".to_string()]);
    }

    /// Every shipped config only names builtin operators
    #[test]
    fn test_shipped_configs_use_builtin_operators() {
        let registry = crate::config::OperatorRegistry::with_builtin_operators();
        for path in ["configs/num-pipeline.yaml", "configs/fan-in.yaml"] {
            let graph = load_and_validate_graph(path).unwrap();
            for (name, spec) in graph.iter() {
                assert!(
                    registry.contains(&spec.module),
                    "{}: node '{}' uses unknown operator '{}'",
                    path,
                    name,
                    spec.module
                );
            }
        }
    }

    /// Loading a missing file surfaces the I/O failure, not a validation error
    #[test]
    fn test_missing_config_file() {
        let result = load_and_validate_graph("configs/does-not-exist.yaml");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    /// Checks run in a fixed order: a graph that is both cyclic and has a
    /// dangling parent reports the dangling parent
    #[test]
    fn test_referential_integrity_checked_before_cycles() {
        let graph = Graph::new()
            .with_node("A", NodeSpec::new("m").with_parents(["B"]))
            .with_node("B", NodeSpec::new("m").with_parents(["A", "ghost"]));

        assert_eq!(
            validate_graph(&graph),
            Err(ValidationError::UnknownParent {
                node: "B".to_string(),
                parent: "ghost".to_string(),
            })
        );
    }
}
