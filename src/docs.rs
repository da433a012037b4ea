use crate::api::attendance::{AttendanceQuery, CheckRequest, StatusRequest};
use crate::api::holiday::{HolidayCheckQuery, HolidayQuery};
use crate::api::leave::{LeaveQuery, LeaveStatusRequest};
use crate::api::overtime::OvertimeQuery;
use crate::api::position::PositionQuery;
use crate::api::salary::SalaryQuery;
use crate::auth::handlers::{LoginRequest, RegisterRequest};
use crate::auth::store::{AuthState, ProfileUpdate};
use crate::model::{
    Attendance, AttendanceStatus, Department, Employee, EmployeeStatus, Holiday, HolidayType,
    LeaveRequest, LeaveStatus, LeaveType, Overtime, Position, Salary, SalaryStatus, User, UserRole,
};
use crate::services::department::{DepartmentUpdate, NewDepartment};
use crate::services::employee::{EmployeeUpdate, NewEmployee};
use crate::services::holiday::{HolidayUpdate, NewHoliday};
use crate::services::leave::NewLeaveRequest;
use crate::services::overtime::{NewOvertime, OvertimeUpdate};
use crate::services::position::{NewPosition, PositionUpdate};
use crate::services::salary::{NewSalary, SalaryUpdate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management API",
        version = "1.0.0",
        description = r#"
## Employee Management Portal

This API powers an employee management portal backed by a hosted table service.

### Key Features
- **Employees, Departments & Positions** - organizational master data
- **Attendance** - daily check-in / check-out with status corrections
- **Leave** - requests with an approval workflow
- **Overtime** - entries with admin approval
- **Salaries** - component-based payslips with a paid marker
- **Holidays** - company calendar with per-date lookups

### Security
Everything under the API prefix requires a signed-in session; mutating
endpoints additionally require the **admin** role.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::register,
        crate::auth::handlers::logout,
        crate::auth::handlers::session,
        crate::auth::handlers::update_profile,

        crate::api::employee::list,
        crate::api::employee::get,
        crate::api::employee::create,
        crate::api::employee::update,
        crate::api::employee::delete,

        crate::api::department::list,
        crate::api::department::get,
        crate::api::department::create,
        crate::api::department::update,
        crate::api::department::delete,

        crate::api::position::list,
        crate::api::position::get,
        crate::api::position::create,
        crate::api::position::update,
        crate::api::position::delete,

        crate::api::attendance::list,
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::update_status,
        crate::api::attendance::delete,

        crate::api::leave::list,
        crate::api::leave::create,
        crate::api::leave::update_status,
        crate::api::leave::delete,

        crate::api::overtime::list,
        crate::api::overtime::create,
        crate::api::overtime::approve,
        crate::api::overtime::update,
        crate::api::overtime::delete,

        crate::api::holiday::list,
        crate::api::holiday::check,
        crate::api::holiday::create,
        crate::api::holiday::update,
        crate::api::holiday::delete,

        crate::api::salary::list,
        crate::api::salary::get,
        crate::api::salary::create,
        crate::api::salary::update,
        crate::api::salary::mark_as_paid,
        crate::api::salary::delete
    ),
    components(
        schemas(
            User,
            UserRole,
            AuthState,
            LoginRequest,
            RegisterRequest,
            ProfileUpdate,

            Employee,
            EmployeeStatus,
            NewEmployee,
            EmployeeUpdate,

            Department,
            NewDepartment,
            DepartmentUpdate,

            Position,
            PositionQuery,
            NewPosition,
            PositionUpdate,

            Attendance,
            AttendanceStatus,
            AttendanceQuery,
            CheckRequest,
            StatusRequest,

            LeaveRequest,
            LeaveType,
            LeaveStatus,
            LeaveQuery,
            NewLeaveRequest,
            LeaveStatusRequest,

            Overtime,
            OvertimeQuery,
            NewOvertime,
            OvertimeUpdate,

            Holiday,
            HolidayType,
            HolidayQuery,
            HolidayCheckQuery,
            NewHoliday,
            HolidayUpdate,

            Salary,
            SalaryStatus,
            SalaryQuery,
            NewSalary,
            SalaryUpdate
        )
    ),
    tags(
        (name = "Auth", description = "Session and profile APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "Position", description = "Position management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Overtime", description = "Overtime management APIs"),
        (name = "Holiday", description = "Holiday calendar APIs"),
        (name = "Salary", description = "Salary management APIs"),
    )
)]
pub struct ApiDoc;
