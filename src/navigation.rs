//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

/// The navigation bar shown at the top of every page.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::TASKS_VIEW,
                title: "Tasks",
                is_current: active_endpoint == endpoints::TASKS_VIEW,
            },
            Link {
                url: endpoints::EXPENSES_VIEW,
                title: "Expenses",
                is_current: active_endpoint == endpoints::EXPENSES_VIEW,
            },
            Link {
                url: endpoints::SHOPPING_VIEW,
                title: "Shopping",
                is_current: active_endpoint == endpoints::SHOPPING_VIEW,
            },
            Link {
                url: endpoints::MEMBERS_VIEW,
                title: "Members",
                is_current: active_endpoint == endpoints::MEMBERS_VIEW,
            },
        ];

        NavBar { links }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html! {
            nav class="bg-white border-gray-200 dark:bg-gray-900 mb-4"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::DASHBOARD_VIEW) class="flex items-center space-x-3"
                    {
                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Domora"
                        }
                    }

                    div class="w-full lg:block lg:w-auto"
                    {
                        ul class="font-medium flex flex-col p-4 lg:p-0 mt-4 border border-gray-100 \
                            rounded-lg bg-gray-50 lg:flex-row lg:space-x-8 rtl:space-x-reverse \
                            lg:mt-0 lg:border-0 lg:bg-white dark:bg-gray-800 lg:dark:bg-gray-900 \
                            dark:border-gray-700"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::endpoints;

    use super::NavBar;

    #[test]
    fn contains_links_to_main_pages() {
        let html = NavBar::new(endpoints::TASKS_VIEW).into_html().into_string();

        assert!(html.contains(endpoints::DASHBOARD_VIEW));
        assert!(html.contains(endpoints::TASKS_VIEW));
        assert!(html.contains(endpoints::EXPENSES_VIEW));
        assert!(html.contains(endpoints::SHOPPING_VIEW));
        assert!(html.contains(endpoints::MEMBERS_VIEW));
    }
}
