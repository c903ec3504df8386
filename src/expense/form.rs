//! The shared expense form used by the create and edit pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    expense::core::Expense,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_LABEL_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    member::Member,
};

/// Whether the form creates a new expense or edits an existing one.
pub(super) enum ExpenseFormMode<'a> {
    Create {
        /// The default date for the date input.
        today: Date,
    },
    Edit {
        /// The expense whose values prefill the form.
        expense: &'a Expense,
    },
}

pub(super) fn expense_form_view(
    endpoint: &str,
    members: &[Member],
    mode: &ExpenseFormMode,
) -> Markup {
    // A create form posts, an edit form puts.
    let (post_endpoint, put_endpoint) = match mode {
        ExpenseFormMode::Create { .. } => (Some(endpoint), None),
        ExpenseFormMode::Edit { .. } => (None, Some(endpoint)),
    };

    let (date, description, amount, category, created_by) = match mode {
        ExpenseFormMode::Create { today } => (*today, String::new(), String::new(), String::new(), None),
        ExpenseFormMode::Edit { expense } => (
            expense.date,
            expense.description.clone(),
            format!("{:.2}", expense.amount_cents as f64 / 100.0),
            expense.category.clone(),
            Some(expense.created_by),
        ),
    };

    let is_payer = |member_id| match mode {
        ExpenseFormMode::Create { .. } => false,
        ExpenseFormMode::Edit { expense } => expense.payers.contains(&member_id),
    };
    let is_beneficiary = |member_id| match mode {
        // Most expenses are for everyone, so pre-tick the whole household.
        ExpenseFormMode::Create { .. } => true,
        ExpenseFormMode::Edit { expense } => expense.beneficiaries.contains(&member_id),
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
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    id="description"
                    type="text"
                    name="description"
                    value=(description)
                    placeholder="What was the money spent on?"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount (€)" }
                input
                    id="amount"
                    type="number"
                    name="amount"
                    value=(amount)
                    min="0.01"
                    step="0.01"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    id="category"
                    type="text"
                    name="category"
                    value=(category)
                    placeholder="Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id="date"
                    type="date"
                    name="date"
                    value=(date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="created_by" class=(FORM_LABEL_STYLE) { "Added by" }
                select id="created_by" name="created_by" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for member in members {
                        option
                            value=(member.id)
                            selected[created_by == Some(member.id)]
                        {
                            (member.name)
                        }
                    }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Paid by" }

                @for member in members {
                    div class="flex items-center mb-1"
                    {
                        input
                            id=(format!("payer-{}", member.id))
                            type="checkbox"
                            name="payers"
                            value=(member.id)
                            checked[is_payer(member.id)]
                            class=(FORM_CHECKBOX_STYLE);
                        label for=(format!("payer-{}", member.id)) class=(FORM_CHECKBOX_LABEL_STYLE)
                        {
                            (member.name)
                        }
                    }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "For" }

                @for member in members {
                    div class="flex items-center mb-1"
                    {
                        input
                            id=(format!("beneficiary-{}", member.id))
                            type="checkbox"
                            name="beneficiaries"
                            value=(member.id)
                            checked[is_beneficiary(member.id)]
                            class=(FORM_CHECKBOX_STYLE);
                        label
                            for=(format!("beneficiary-{}", member.id))
                            class=(FORM_CHECKBOX_LABEL_STYLE)
                        {
                            (member.name)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                @match mode {
                    ExpenseFormMode::Create { .. } => "Add Expense",
                    ExpenseFormMode::Edit { .. } => "Save Changes",
                }
            }
        }
    }
}
