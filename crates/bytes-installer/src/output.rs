//! Plain-text rendering of plans and executions.

use bytes_schema::Plan;

use crate::runner::{Execution, Outcome};

const EMPTY: &str = "No queries to be executed.";

/// Renders a plan preview: every statement, the reason under changed
/// statements, and a confirmation hint.
#[must_use]
pub fn render_plan(plan: &Plan) -> String {
    if plan.is_empty() {
        return format!("{EMPTY}\n");
    }

    let mut output = String::new();
    for statement in plan.statements() {
        output.push_str(&statement.sql);
        output.push('\n');
        if let Some(ref description) = statement.description {
            output.push_str(&format!(" ?? {description}\n\n"));
        }
    }
    output.push_str(&format!("\n{:=<60}\n", ""));
    output.push_str("Run `bytes-installer apply --confirm` to execute these statements.\n");
    output
}

/// Renders the result of running a plan: every statement followed by
/// ` > OK!` or ` > <error>`.
#[must_use]
pub fn render_executions(executions: &[Execution]) -> String {
    if executions.is_empty() {
        return format!("{EMPTY}\n");
    }

    executions
        .iter()
        .map(|execution| {
            let result = match execution.outcome {
                Outcome::Ok => "OK!",
                Outcome::Failed(ref error) => error.as_str(),
            };
            format!("{}\n > {result}\n\n", execution.statement.sql)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes_schema::{Difference, Statement, StatementKind, Subject};

    fn statement(sql: &str, description: Option<Difference>) -> Statement {
        Statement {
            kind: StatementKind::ChangeColumn,
            sql: sql.to_string(),
            description,
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_plan(&Plan::new()), "No queries to be executed.\n");
        assert_eq!(render_executions(&[]), "No queries to be executed.\n");
    }

    #[test]
    fn test_render_executions() {
        let executions = vec![
            Execution {
                statement: statement("A", None),
                outcome: Outcome::Ok,
            },
            Execution {
                statement: statement("B", None),
                outcome: Outcome::Failed("Duplicate column".to_string()),
            },
        ];
        assert_eq!(
            render_executions(&executions),
            "A\n > OK!\n\nB\n > Duplicate column\n\n"
        );
    }

    #[test]
    fn test_render_descriptions() {
        let description = Difference {
            subject: Subject::Column,
            name: "Email".to_string(),
            property: "Arguments",
            declared: "[255]".to_string(),
            existing: "[100]".to_string(),
        };
        let plan: Plan = vec![statement("A", Some(description)), statement("B", None)]
            .into_iter()
            .collect();

        let rendered = render_plan(&plan);
        assert!(rendered.starts_with(
            "A\n ?? Email differs in the Arguments property from existing column ( [255] => [100] )\n\nB\n\n"
        ));
        assert!(rendered.contains(&format!("\n\n{}\n", "=".repeat(60))));
        assert!(rendered.ends_with("to execute these statements.\n"));
    }
}
