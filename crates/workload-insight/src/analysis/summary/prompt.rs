use super::stats::MemberStats;
use std::fmt::Write;

const INSTRUCTIONS: &str = "\
Please write a personal work summary of roughly 300 words that covers:
1. Overall workload and working efficiency
2. Main task focus areas
3. Saturation level and how reasonable it is
4. Suggestions for improvement

Keep the tone professional and constructive.";

pub fn build_prompt(stats: &MemberStats) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Based on the following timesheet data, write a work summary for team member {}.",
        stats.name
    );
    prompt.push('\n');
    let _ = writeln!(prompt, "Total tasks: {}", stats.total_tasks);
    let _ = writeln!(prompt, "Completed tasks: {}", stats.completed_tasks);
    let _ = writeln!(prompt, "Average saturation: {:.1}%", stats.avg_saturation);
    prompt.push('\n');
    prompt.push_str("Task type breakdown:\n");
    for (task_type, count) in stats.task_types.iter() {
        let noun = if count == 1 { "task" } else { "tasks" };
        let _ = writeln!(prompt, "- {task_type}: {count} {noun}");
    }
    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt
}
