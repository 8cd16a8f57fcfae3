// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// Site details and the capabilities of the web service user.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteInfo {
    pub sitename: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub fullname: String,
    pub lang: String,
    pub userid: i64,
    pub siteurl: String,
    pub userpictureurl: String,
    pub functions: Vec<Function>,
    pub downloadfiles: i64,
    pub uploadfiles: i64,
    pub release: String,
    pub version: String,
    pub mobilecssurl: String,
    pub advancedfeatures: Vec<AdvancedFeature>,
    pub usercanmanageownfiles: bool,
    pub userquota: i64,
    pub usermaxuploadfilesize: i64,
    pub userhomepage: i64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Function {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdvancedFeature {
    pub name: String,
    pub value: i64,
}
