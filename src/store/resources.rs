// SPDX-License-Identifier: MPL-2.0
//! The three portfolio resources plugged into the generic fetch slice.

use super::fetch_slice::{FetchAction, FetchState};
use super::{Action, RootState};
use crate::domain::{Education, Profile, WorkExperience};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Static parameters of one fetch slice.
pub trait Resource: Send + Sync + 'static {
    /// Shape of `data`; its `Default` is the empty value `clear()` restores.
    type Data: DeserializeOwned + Default + Debug + Send + Sync + 'static;

    /// URL segment: `{base}/{language}/{NAME}.json`.
    const NAME: &'static str;

    /// Error stored when the failure carries no message.
    const DEFAULT_ERROR: &'static str;

    fn slice_mut(state: &mut RootState) -> &mut FetchState<Self::Data>;

    /// Wraps a slice transition into a store-level action.
    fn action(action: FetchAction<Self::Data>) -> Action;
}

/// Single profile document, `None` until fetched.
#[derive(Debug)]
pub struct ProfileResource;

impl Resource for ProfileResource {
    type Data = Option<Profile>;
    const NAME: &'static str = "profile";
    const DEFAULT_ERROR: &'static str = "Failed to fetch profile";

    fn slice_mut(state: &mut RootState) -> &mut FetchState<Self::Data> {
        &mut state.profile
    }

    fn action(action: FetchAction<Self::Data>) -> Action {
        Action::Profile(action)
    }
}

#[derive(Debug)]
pub struct EducationResource;

impl Resource for EducationResource {
    type Data = Vec<Education>;
    const NAME: &'static str = "education";
    const DEFAULT_ERROR: &'static str = "Failed to fetch education";

    fn slice_mut(state: &mut RootState) -> &mut FetchState<Self::Data> {
        &mut state.education
    }

    fn action(action: FetchAction<Self::Data>) -> Action {
        Action::Education(action)
    }
}

#[derive(Debug)]
pub struct WorkExperienceResource;

impl Resource for WorkExperienceResource {
    type Data = Vec<WorkExperience>;
    const NAME: &'static str = "workxp";
    const DEFAULT_ERROR: &'static str = "Failed to fetch work experience";

    fn slice_mut(state: &mut RootState) -> &mut FetchState<Self::Data> {
        &mut state.work_experience
    }

    fn action(action: FetchAction<Self::Data>) -> Action {
        Action::WorkExperience(action)
    }
}
