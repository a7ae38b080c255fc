//! Demo organisation used by `HrModule::demo` and the server's default store.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use platform_authz::Role;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    AttendanceRecord, AttendanceStatus, Department, Employee, InMemoryRepository, Message,
    MessageType, Task, TaskPriority, TaskStatus,
};

const EMAIL_DOMAIN: &str = "cognifyz.com";
const ATTENDANCE_SEED: u64 = 2024_11_01;

fn ymd(raw: &str) -> NaiveDate {
    raw.parse().unwrap_or_default()
}

fn timestamp(raw: &str) -> NaiveDateTime {
    raw.parse().unwrap_or_default()
}

pub fn demo_repository() -> InMemoryRepository {
    let employees = demo_employees();
    let attendance = demo_attendance(&employees);
    InMemoryRepository::new(employees)
        .with_tasks(demo_tasks())
        .with_messages(demo_messages())
        .with_attendance(attendance)
}

pub fn demo_employees() -> Vec<Employee> {
    use Department::*;
    use Role::{
        AssistantManager, Ceo, Coo, Cto, FounderDirector, Intern, Manager, SeniorEmployee,
        SeniorManager, TeamLead, VicePresident,
    };

    let rows: [(&str, &str, Role, Department, Option<&str>, i64, &str); 20] = [
        ("1", "Aravind Subramanian", FounderDirector, Executive, None, 500_000, "2018-01-15"),
        ("2", "Karthik Narayanan", Ceo, Executive, Some("1"), 400_000, "2018-03-20"),
        ("3", "Praveen Rajendran", Cto, Engineering, Some("2"), 350_000, "2018-06-10"),
        ("4", "Santhosh Manikandan", Coo, Operations, Some("2"), 350_000, "2018-07-01"),
        ("5", "Vijay Kumaravel", VicePresident, Engineering, Some("3"), 280_000, "2019-02-15"),
        ("6", "Hariharan Srinivasan", VicePresident, Marketing, Some("4"), 275_000, "2019-04-20"),
        ("7", "Raghav Chandrasekar", SeniorManager, Engineering, Some("5"), 200_000, "2019-08-10"),
        ("8", "Suresh Balasubramaniam", SeniorManager, Product, Some("5"), 195_000, "2019-09-15"),
        ("9", "Ashwin Krishnan", Manager, Engineering, Some("7"), 150_000, "2020-01-20"),
        ("10", "Lokesh Ramanathan", Manager, Marketing, Some("6"), 145_000, "2020-03-10"),
        ("11", "Priya Lakshmanan", AssistantManager, Engineering, Some("9"), 110_000, "2020-06-15"),
        ("12", "Divya Bharathi", AssistantManager, HumanResources, Some("4"), 105_000, "2020-08-20"),
        ("13", "Kavya Ramesh", TeamLead, Engineering, Some("11"), 90_000, "2021-01-10"),
        ("14", "Aishwarya Venkatesh", TeamLead, Sales, Some("10"), 85_000, "2021-03-15"),
        ("15", "Nithya Saravanan", SeniorEmployee, Engineering, Some("13"), 75_000, "2021-06-20"),
        ("16", "Sandhya Murugan", SeniorEmployee, Product, Some("8"), 72_000, "2021-08-10"),
        ("17", "Janani Parthiban", Role::Employee, Engineering, Some("13"), 55_000, "2022-01-15"),
        ("18", "Swetha Ilangovan", Role::Employee, Marketing, Some("10"), 52_000, "2022-03-20"),
        ("19", "Ramya Kannan", Role::Employee, Sales, Some("14"), 50_000, "2022-06-10"),
        ("20", "Meena Gopinath", Intern, Engineering, Some("13"), 25_000, "2024-01-15"),
    ];

    rows.into_iter()
        .map(|(id, name, role, department, manager, salary, joined)| Employee {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@{EMAIL_DOMAIN}", name.to_lowercase().replace(' ', ".")),
            role,
            department,
            reporting_manager_id: manager.map(str::to_string),
            salary,
            join_date: ymd(joined),
        })
        .collect()
}

pub fn demo_tasks() -> Vec<Task> {
    use TaskPriority::*;
    use TaskStatus::*;

    let rows = [
        ("t1", "Annual strategy review", "Consolidate department goals into the 2025 strategy deck.", "2", "1", InProgress, High, "2024-12-15", "2024-11-01"),
        ("t2", "Operations budget proposal", "Prepare the Q1 2025 operations budget for the board meeting.", "4", "2", Pending, High, "2025-01-10", "2024-11-10"),
        ("t3", "Product launch timeline", "Revise the launch schedule and flag delivery risks.", "3", "2", InProgress, Critical, "2024-12-05", "2024-11-05"),
        ("t4", "System architecture review", "Review the service architecture and propose improvements.", "5", "3", Completed, High, "2024-11-14", "2024-10-20"),
        ("t5", "Project status report", "Summarise all ongoing engineering projects for leadership.", "7", "5", Pending, Medium, "2024-12-12", "2024-11-20"),
        ("t6", "Leave policy refresh", "Update the leave policy handbook for 2025.", "12", "4", InProgress, Medium, "2024-12-20", "2024-11-18"),
        ("t7", "Integration test suite", "Set up integration tests for the billing service.", "15", "11", Pending, Low, "2024-12-30", "2024-11-25"),
        ("t8", "Onboarding guide", "Write onboarding documentation for new engineering interns.", "20", "7", Pending, Low, "2024-12-18", "2024-11-26"),
        ("t12", "API documentation", "Document the authentication endpoints with request examples.", "13", "9", InProgress, Medium, "2024-12-06", "2024-11-15"),
        ("t16", "Authentication PR review", "Review the authentication feature pull request before merge.", "17", "11", Pending, High, "2024-12-06", "2024-11-29"),
        ("t17", "December content calendar", "Plan the holiday campaign content calendar.", "18", "10", Completed, Medium, "2024-11-26", "2024-11-12"),
    ];

    rows.into_iter()
        .map(
            |(id, title, description, to, by, status, priority, due, created)| Task {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                assigned_to: to.to_string(),
                assigned_by: by.to_string(),
                status,
                priority,
                due_date: ymd(due),
                created_at: ymd(created),
                updated_at: ymd(created),
            },
        )
        .collect()
}

pub fn demo_messages() -> Vec<Message> {
    use MessageType::*;

    let rows = [
        ("m1", "1", "2", Instruction, "Q4 Priorities", "Please ensure all department heads submit their Q4 reports by December 15th. This is critical for our annual review.", None, true, "2024-11-01T09:00:00"),
        ("m2", "2", "3", Direct, "Product Launch Timeline", "Can we discuss the product launch timeline? I have some concerns about the current schedule.", None, true, "2024-11-05T14:30:00"),
        ("m3", "2", "4", Direct, "Operations Budget", "Please prepare the operations budget proposal for Q1 2025. We need to present it at the board meeting.", None, false, "2024-11-10T11:00:00"),
        ("m4", "3", "5", Feedback, "Great work on the architecture review", "Excellent job on the system architecture review. Your recommendations have been approved for implementation.", Some("t4"), true, "2024-11-15T16:00:00"),
        ("m5", "5", "7", Instruction, "Team Meeting Tomorrow", "Please prepare a status update on all ongoing projects for tomorrow's team meeting at 10 AM.", None, true, "2024-11-20T17:30:00"),
        ("m6", "7", "9", Direct, "Sprint Planning", "Let's sync up before the sprint planning session. I want to discuss the priority of some backlog items.", None, false, "2024-11-25T09:15:00"),
        ("m7", "9", "13", Feedback, "API Documentation Feedback", "Good progress on the API documentation. Please add more examples for the authentication endpoints.", Some("t12"), true, "2024-11-28T14:00:00"),
        ("m8", "13", "17", Instruction, "Code Review Required", "Please review the PR for the authentication feature. We need to merge it by end of week.", Some("t16"), false, "2024-11-30T10:00:00"),
        ("m9", "6", "10", Direct, "Marketing Campaign Update", "How is the holiday campaign progressing? I need to update the CEO on our marketing initiatives.", None, true, "2024-11-22T11:30:00"),
        ("m10", "10", "18", Feedback, "Content Calendar Approved", "Great job on the December content calendar! Everything has been approved. Let's start execution.", Some("t17"), true, "2024-11-27T15:45:00"),
    ];

    rows.into_iter()
        .map(
            |(id, from, to, kind, subject, content, task, read, at)| Message {
                id: id.to_string(),
                sender_id: from.to_string(),
                receiver_id: to.to_string(),
                kind,
                subject: subject.to_string(),
                content: content.to_string(),
                task_id: task.map(str::to_string),
                read,
                created_at: timestamp(at),
            },
        )
        .collect()
}

/// Weekday attendance for November 2024 and the first days of December.
pub fn demo_attendance(employees: &[Employee]) -> Vec<AttendanceRecord> {
    let mut rng = StdRng::seed_from_u64(ATTENDANCE_SEED);
    let ranges = [
        (ymd("2024-11-01"), ymd("2024-11-30")),
        (ymd("2024-12-01"), ymd("2024-12-09")),
    ];
    let shift_start = "09:00:00".parse().ok();

    let mut records = Vec::new();
    for (first, last) in ranges {
        let mut day = first;
        while day <= last {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                for emp in employees {
                    let status = match rng.gen_range(0.0..1.0) {
                        r if r < 0.85 => AttendanceStatus::Present,
                        r if r < 0.92 => AttendanceStatus::Leave,
                        r if r < 0.97 => AttendanceStatus::HalfDay,
                        _ => AttendanceStatus::Absent,
                    };
                    let check_out = match status {
                        AttendanceStatus::Present => "18:00:00".parse().ok(),
                        AttendanceStatus::HalfDay => "13:00:00".parse().ok(),
                        _ => None,
                    };
                    records.push(AttendanceRecord {
                        id: AttendanceRecord::record_id(&emp.id, day),
                        employee_id: emp.id.clone(),
                        date: day,
                        status,
                        check_in: if status.is_on_site() { shift_start } else { None },
                        check_out,
                        notes: None,
                    });
                }
            }
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
    }
    records
}
