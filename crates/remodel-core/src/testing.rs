//! Shared test schema: users with tasks and a plan

use crate::schema::{EntityDef, Schema, Wrapper};
use crate::value::AttrKind;

pub(crate) fn schema() -> Schema {
    Schema::builder()
        .entity(
            EntityDef::new("User")
                .location("http://example.com/users")
                .attribute("name", AttrKind::String)
                .attribute("plan_id", AttrKind::Integer)
                .attribute("email", AttrKind::String)
                .attribute("age", AttrKind::Integer)
                .attribute("admin", AttrKind::Boolean)
                .sync_stamp("last_sync_at")
                .has_many("tasks", "Task")
                .belongs_to("plan", "Plan")
                .wrapper(
                    Wrapper::new()
                        .field("id", "id")
                        .field("plan_id", "plan_id")
                        .field("name", "name")
                        .field("email", "email")
                        .field("age", "age")
                        .field("admin", "admin")
                        .relation("tasks")
                        .relation("plan"),
                ),
        )
        .entity(
            EntityDef::new("Task")
                .location("http://example.com/tasks")
                .attribute("name", AttrKind::String)
                .attribute("user_id", AttrKind::Integer)
                .attribute("due_date", AttrKind::Time)
                .attribute("updated_at", AttrKind::Date)
                .belongs_to("user", "User")
                .wrapper(
                    Wrapper::new()
                        .field("id", "id")
                        .field("user_id", "user_id")
                        .field("name", "name")
                        .field("due_date", "due_date")
                        .relation("user"),
                ),
        )
        .entity(
            EntityDef::new("Plan")
                .location("http://example.com/plans")
                .attribute("name", AttrKind::String)
                .has_many("users", "User")
                .wrapper(
                    Wrapper::new()
                        .field("id", "id")
                        .field("name", "name")
                        .relation("users"),
                ),
        )
        .entity(
            EntityDef::new("PlanWithoutUrl")
                .attribute("name", AttrKind::String)
                .wrapper(Wrapper::new().field("id", "id").field("name", "name")),
        )
        .entity(
            EntityDef::new("UserWithoutWrapper")
                .location("http://example.com/users")
                .attribute("name", AttrKind::String)
                .attribute("email", AttrKind::String)
                .attribute("age", AttrKind::Integer)
                .attribute("admin", AttrKind::Boolean),
        )
        .entity(
            EntityDef::new("BrokenTask")
                .location("http://example.com/broken_tasks")
                .attribute("name", AttrKind::String)
                .wrapper(
                    Wrapper::new()
                        .field("id", "id")
                        .field("name", "name")
                        .field("nick", "nickname"),
                ),
        )
        .build()
        .expect("test schema is valid")
}
