//! Named events used by the showcase pages.

use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::error::ReportError;
use crate::params;

impl Dispatcher {
    /// `template_view`
    pub fn track_template_view(
        &self,
        template_id: &str,
        template_name: &str,
        category: &str,
    ) -> Result<(), ReportError> {
        self.record(
            "template_view",
            params! {
                "template_id" => template_id,
                "template_name" => template_name,
                "template_category" => category,
                "event_category" => "template_interaction",
            },
        )
    }

    /// `template_demo_click`
    pub fn track_template_demo(
        &self,
        template_id: &str,
        template_name: &str,
        demo_url: &str,
    ) -> Result<(), ReportError> {
        self.record(
            "template_demo_click",
            params! {
                "template_id" => template_id,
                "template_name" => template_name,
                "demo_url" => demo_url,
                "event_category" => "template_interaction",
            },
        )
    }

    /// `template_filter_used`
    pub fn track_template_filter(
        &self,
        filter_type: &str,
        filter_value: &str,
    ) -> Result<(), ReportError> {
        self.record(
            "template_filter_used",
            params! {
                "filter_type" => filter_type,
                "filter_value" => filter_value,
                "event_category" => "template_interaction",
            },
        )
    }

    /// `project_view`
    pub fn track_project_view(
        &self,
        project_id: &str,
        project_name: &str,
        category: &str,
    ) -> Result<(), ReportError> {
        self.record(
            "project_view",
            params! {
                "project_id" => project_id,
                "project_name" => project_name,
                "project_category" => category,
                "event_category" => "project_interaction",
            },
        )
    }

    /// `project_github_click`
    pub fn track_project_github(
        &self,
        project_id: &str,
        project_name: &str,
        github_url: &str,
    ) -> Result<(), ReportError> {
        self.record(
            "project_github_click",
            params! {
                "project_id" => project_id,
                "project_name" => project_name,
                "github_url" => github_url,
                "event_category" => "project_interaction",
            },
        )
    }

    /// `contact_method_used`
    pub fn track_contact_method(&self, method: &str, destination: &str) -> Result<(), ReportError> {
        self.record(
            "contact_method_used",
            params! {
                "contact_method" => method,
                "destination" => destination,
                "event_category" => "engagement",
            },
        )
    }

    /// `social_media_click`
    pub fn track_social_click(&self, platform: &str, url: &str) -> Result<(), ReportError> {
        self.record(
            "social_media_click",
            params! {
                "social_platform" => platform,
                "social_url" => url,
                "event_category" => "engagement",
            },
        )
    }

    /// `navigation_used`; `method` defaults to `click`.
    pub fn track_navigation(&self, section: &str, method: Option<&str>) -> Result<(), ReportError> {
        self.record(
            "navigation_used",
            params! {
                "section" => section,
                "navigation_method" => method.unwrap_or("click"),
                "event_category" => "navigation",
            },
        )
    }

    /// `scroll_depth`
    pub fn track_scroll_depth(&self, depth: u8) -> Result<(), ReportError> {
        self.record(
            "scroll_depth",
            params! {
                "scroll_depth_percent" => depth,
                "event_category" => "engagement",
            },
        )
    }

    /// `file_download`
    pub fn track_download(&self, file_name: &str, file_type: &str) -> Result<(), ReportError> {
        self.record(
            "file_download",
            params! {
                "file_name" => file_name,
                "file_type" => file_type,
                "event_category" => "engagement",
            },
        )
    }

    /// `javascript_error`; `context` is sent as given.
    pub fn track_error(
        &self,
        error_type: &str,
        message: &str,
        context: Value,
    ) -> Result<(), ReportError> {
        self.record(
            "javascript_error",
            params! {
                "error_type" => error_type,
                "error_message" => message,
                "error_context" => context,
                "event_category" => "error",
            },
        )
    }
}
