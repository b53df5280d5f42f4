//! @APIVersion 1.0.0
//! @Title beego Test API
//! @Description beego has a very cool tools to autogenerate documents for your API
//! @Contact astaxie@gmail.com
//! @TermsOfServiceUrl http://beego.me/
//! @License Apache 2.0
//! @LicenseUrl http://www.apache.org/licenses/LICENSE-2.0.html

use beego::{add_namespace, new_namespace, ns_include, ns_namespace};
use crate::filters::auth_filter;
use myapp::controllers;
use myapp::controllers::ObjectController;

pub fn init() {
    let ns = new_namespace(
        "/v1",
        ns_namespace("/object", ns_include(&ObjectController {})),
        ns_namespace("/user", ns_include(&controllers::UserController {})),
    );
    beego::insert_filter("/v1/*", auth_filter);
    add_namespace(ns);
}
