//! The shared task form used by the create and edit pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_LABEL_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    member::Member,
    task::core::{FairnessMode, Task},
};

/// Whether the form creates a new task or edits an existing one.
pub(super) enum TaskFormMode<'a> {
    Create {
        /// The default due date for the date input.
        today: Date,
    },
    Edit {
        /// The task whose values prefill the form.
        task: &'a Task,
    },
}

pub(super) fn task_form_view(endpoint: &str, members: &[Member], mode: &TaskFormMode) -> Markup {
    let (post_endpoint, put_endpoint) = match mode {
        TaskFormMode::Create { .. } => (Some(endpoint), None),
        TaskFormMode::Edit { .. } => (None, Some(endpoint)),
    };

    let (title, frequency_days, effort, due_date, prioritize, fairness_mode, active) = match mode {
        TaskFormMode::Create { today } => {
            (String::new(), 7, 5, *today, false, FairnessMode::Actual, true)
        }
        TaskFormMode::Edit { task } => (
            task.title.clone(),
            task.frequency_days,
            task.effort,
            task.due_date,
            task.prioritize_low_points,
            task.fairness_mode,
            task.active,
        ),
    };

    let in_rotation = |member_id| match mode {
        TaskFormMode::Create { .. } => false,
        TaskFormMode::Edit { task } => task.rotation.contains(&member_id),
    };

    html! {
        form
            hx-post=[post_endpoint]
            hx-put=[put_endpoint]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }
                input
                    id="title"
                    type="text"
                    name="title"
                    value=(title)
                    placeholder="Take out the bins"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="frequency_days" class=(FORM_LABEL_STYLE) { "Frequency (days)" }
                input
                    id="frequency_days"
                    type="number"
                    name="frequency_days"
                    value=(frequency_days)
                    min="1"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="effort" class=(FORM_LABEL_STYLE) { "Effort points" }
                input
                    id="effort"
                    type="number"
                    name="effort"
                    value=(effort)
                    min="0"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="due_date" class=(FORM_LABEL_STYLE) { "First due" }
                input
                    id="due_date"
                    type="date"
                    name="due_date"
                    value=(due_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Rotation" }

                @for member in members {
                    div class="flex items-center mb-1"
                    {
                        input
                            id=(format!("rotation-{}", member.id))
                            type="checkbox"
                            name="rotation"
                            value=(member.id)
                            checked[in_rotation(member.id)]
                            class=(FORM_CHECKBOX_STYLE);
                        label
                            for=(format!("rotation-{}", member.id))
                            class=(FORM_CHECKBOX_LABEL_STYLE)
                        {
                            (member.name)
                        }
                    }
                }
            }

            div class="flex items-center"
            {
                input
                    id="prioritize_low_points"
                    type="checkbox"
                    name="prioritize_low_points"
                    value="true"
                    checked[prioritize]
                    class=(FORM_CHECKBOX_STYLE);
                label for="prioritize_low_points" class=(FORM_CHECKBOX_LABEL_STYLE)
                {
                    "Assign to whoever has done the least"
                }
            }

            div
            {
                label for="fairness_mode" class=(FORM_LABEL_STYLE) { "Fairness mode" }
                select id="fairness_mode" name="fairness_mode" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="actual" selected[fairness_mode == FairnessMode::Actual]
                    {
                        "Actual points"
                    }
                    option value="projection" selected[fairness_mode == FairnessMode::Projection]
                    {
                        "Projected workload"
                    }
                }
            }

            @if let TaskFormMode::Edit { .. } = mode {
                div
                {
                    label for="active" class=(FORM_LABEL_STYLE) { "Status" }
                    select id="active" name="active" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="true" selected[active] { "Active" }
                        option value="false" selected[!active] { "Paused" }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                @match mode {
                    TaskFormMode::Create { .. } => "Add Task",
                    TaskFormMode::Edit { .. } => "Save Changes",
                }
            }
        }
    }
}
