pub mod global_context;
pub mod left;
pub mod top_header;

use leptos::prelude::*;
use left::Navbar;
use top_header::TopHeader;

/// Main application shell.
///
/// ```text
/// +------------------------------------------+
/// |              TopHeader                    |
/// +------------------------------------------+
/// |  Navbar   |           Content            |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <TopHeader />
            <div class="app-body">
                <aside class="app-sidebar">
                    <Navbar />
                </aside>
                <div class="app-main">
                    {children()}
                </div>
            </div>
        </div>
    }
}
