//! Workflow spec validation.
//!
//! Validation runs at admission time, before a workflow is handed to the
//! operator. The operator itself tolerates an invalid spec (an undefined
//! template reference becomes a terminal `Error` node), but a recursive
//! spec would expand without bound inside a single evaluation pass, so the
//! external API layer is expected to reject specs here first.

use std::collections::HashSet;

use crate::error::WorkflowError;
use crate::template::Template;
use crate::workflow::WorkflowSpec;

impl WorkflowSpec {
  /// Validate the spec.
  ///
  /// Checks that the entrypoint and every step reference resolve, that step
  /// groups are non-empty, and that no template reachable from the
  /// entrypoint references itself, directly or through other templates.
  pub fn validate(&self) -> Result<(), WorkflowError> {
    if self.template(&self.entrypoint).is_none() {
      return Err(WorkflowError::UndefinedEntrypoint(self.entrypoint.clone()));
    }
    let mut visiting = HashSet::new();
    let mut visited = HashSet::new();
    self.check_template(&self.entrypoint, &mut visiting, &mut visited)
  }

  fn check_template(
    &self,
    name: &str,
    visiting: &mut HashSet<String>,
    visited: &mut HashSet<String>,
  ) -> Result<(), WorkflowError> {
    if visited.contains(name) {
      return Ok(());
    }
    if !visiting.insert(name.to_string()) {
      return Err(WorkflowError::RecursiveTemplate(name.to_string()));
    }
    if let Some(Template::Steps(steps)) = self.template(name) {
      for (group, step_group) in steps.groups.iter().enumerate() {
        if step_group.is_empty() {
          return Err(WorkflowError::EmptyStepGroup {
            template: name.to_string(),
            group,
          });
        }
        for step in step_group.values() {
          if self.template(&step.template).is_none() {
            return Err(WorkflowError::UndefinedStepTemplate {
              referenced_by: name.to_string(),
              template: step.template.clone(),
            });
          }
          self.check_template(&step.template, visiting, visited)?;
        }
      }
    }
    visiting.remove(name);
    visited.insert(name.to_string());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::template::{ContainerTemplate, StepsTemplate, WorkflowStep};

  fn leaf() -> Template {
    Template::Container(ContainerTemplate {
      container: serde_json::Value::Null,
    })
  }

  fn step(template: &str) -> WorkflowStep {
    WorkflowStep {
      template: template.to_string(),
      arguments: serde_json::Value::Null,
    }
  }

  fn steps(groups: Vec<Vec<(&str, &str)>>) -> Template {
    Template::Steps(StepsTemplate {
      groups: groups
        .into_iter()
        .map(|group| {
          group
            .into_iter()
            .map(|(name, template)| (name.to_string(), step(template)))
            .collect()
        })
        .collect(),
    })
  }

  fn spec(entrypoint: &str, templates: Vec<(&str, Template)>) -> WorkflowSpec {
    WorkflowSpec {
      entrypoint: entrypoint.to_string(),
      templates: templates
        .into_iter()
        .map(|(name, template)| (name.to_string(), template))
        .collect::<HashMap<_, _>>(),
    }
  }

  #[test]
  fn valid_nested_spec() {
    let spec = spec(
      "main",
      vec![
        ("main", steps(vec![vec![("a", "inner")], vec![("b", "work")]])),
        ("inner", steps(vec![vec![("c", "work")]])),
        ("work", leaf()),
      ],
    );
    spec.validate().unwrap();
  }

  #[test]
  fn undefined_entrypoint() {
    let spec = spec("missing", vec![("work", leaf())]);
    let err = spec.validate().unwrap_err();
    assert!(matches!(err, WorkflowError::UndefinedEntrypoint(_)));
  }

  #[test]
  fn undefined_step_reference() {
    let spec = spec("main", vec![("main", steps(vec![vec![("a", "ghost")]]))]);
    let err = spec.validate().unwrap_err();
    assert!(matches!(err, WorkflowError::UndefinedStepTemplate { .. }));
  }

  #[test]
  fn empty_step_group() {
    let spec = spec(
      "main",
      vec![("main", Template::Steps(StepsTemplate { groups: vec![HashMap::new()] }))],
    );
    let err = spec.validate().unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyStepGroup { group: 0, .. }));
  }

  #[test]
  fn self_recursive_template() {
    let spec = spec("main", vec![("main", steps(vec![vec![("again", "main")]]))]);
    let err = spec.validate().unwrap_err();
    assert!(matches!(err, WorkflowError::RecursiveTemplate(_)));
  }

  #[test]
  fn mutually_recursive_templates() {
    let spec = spec(
      "a",
      vec![
        ("a", steps(vec![vec![("to-b", "b")]])),
        ("b", steps(vec![vec![("to-a", "a")]])),
      ],
    );
    let err = spec.validate().unwrap_err();
    assert!(matches!(err, WorkflowError::RecursiveTemplate(_)));
  }

  #[test]
  fn diamond_reference_is_not_recursion() {
    // The same template referenced from two sibling steps is fine.
    let spec = spec(
      "main",
      vec![
        ("main", steps(vec![vec![("x", "work"), ("y", "work")]])),
        ("work", leaf()),
      ],
    );
    spec.validate().unwrap();
  }
}
